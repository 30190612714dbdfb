//! Server command implementation

use std::path::Path;

use anyhow::Result;

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    no_auth: bool,
    static_dir: Option<&Path>,
) -> Result<()> {
    println!("Starting Keel web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    // Parse API keys from environment (comma-separated)
    let api_keys = keel_server::ServerConfig::api_keys_from_env();

    // Parse allowed CORS origins from environment (comma-separated)
    let allowed_origins: Vec<String> = std::env::var("KEEL_ALLOWED_ORIGINS")
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if no_auth {
        println!();
        println!("   Authentication DISABLED - do not expose to network!");
    } else if api_keys.is_empty() {
        println!();
        println!("   No API keys configured (KEEL_API_KEYS); all requests will be rejected");
    } else {
        println!("   API keys: {} configured (KEEL_API_KEYS)", api_keys.len());
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path)?;

    let config = keel_server::ServerConfig {
        require_auth: !no_auth,
        allowed_origins,
        api_keys,
    };

    let static_dir_str = static_dir.and_then(|p| p.to_str());
    keel_server::serve_with_config(db, host, port, static_dir_str, config).await?;

    Ok(())
}

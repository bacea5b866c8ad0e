use anyhow::Result;
use std::path::Path;

use essync::Config;

/// Write a configuration template with the defaults filled in. Credentials
/// are left blank for the operator (or the environment) to provide.
pub fn init_config(path: &Path) -> Result<()> {
    let config = Config::default();

    let toml_content = format!(
        r#"# essync configuration

[engine]
host = "{}"
port = {}
username = ""
password = ""
insecure_tls = false
timeout_secs = {}

[sync]
index = "{}"
"#,
        config.engine.host, config.engine.port, config.engine.timeout_secs, config.sync.index,
    );

    std::fs::write(path, toml_content)?;
    println!("Created configuration file: {}", path.display());
    Ok(())
}

use anyhow::Result;

use essync::Config;

/// Report the resolved configuration. Validation already ran while loading;
/// reaching this point means the config is usable.
pub fn check_config(config: &Config) -> Result<()> {
    println!("Configuration OK");
    println!("  engine:       {}", config.engine.base_url());
    println!("  index:        {}", config.sync.index);
    println!("  username:     {}", config.engine.username);
    println!("  insecure_tls: {}", config.engine.insecure_tls);
    println!("  timeout_secs: {}", config.engine.timeout_secs);
    Ok(())
}

//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("remote.api_url", "https://api.github.com")?
        .set_default("remote.branch", "main")?
        .set_default("queue.backend", "json")?
        .set_default("queue.path", "queue.json")?
        .set_default("announce.prompt_threshold", 8)
}

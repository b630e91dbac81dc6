pub mod default_config;
pub mod gateway_config;
pub mod llm_provider;

pub use default_config::{config_from_env, config_huggingface, config_openai};
pub use gateway_config::GatewayConfig;
pub use llm_provider::LlmProvider;

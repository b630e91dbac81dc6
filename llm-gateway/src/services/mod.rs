//! Provider-specific LLM clients.

pub mod hf_inference_service;
pub mod open_ai_service;

pub mod quiz_prompts;

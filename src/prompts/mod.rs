pub mod parse;
pub mod render;

pub use parse::parse_prompt_config;
pub use render::{brevity_fragment, format_fragment, reasoning_fragment, render_prompt, style_fragment};

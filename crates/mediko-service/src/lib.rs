pub mod config;
mod generator;
mod http;
pub mod mock;
mod traits;

pub use config::GeneratorConfig;
pub use generator::{Generators, GuidanceGenerator, QuestionGenerator};
pub use http::OpenAiService;
pub use mock::MockService;
pub use traits::{GenerationError, GenerationRequest, GenerationService};

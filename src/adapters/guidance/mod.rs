//! Guidance Adapters
//!
//! Implementations of the GuidanceSynthesizer port.
//!
//! - **TemplateGuidanceSynthesizer** - Rule-based prose, no external calls
//! - **MockGuidanceSynthesizer** - Scripted responses for tests

mod mock_synthesizer;
mod template_synthesizer;

pub use mock_synthesizer::MockGuidanceSynthesizer;
pub use template_synthesizer::TemplateGuidanceSynthesizer;

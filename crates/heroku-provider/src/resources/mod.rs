//! Built-in resource handlers, one module per resource type.

mod addon;
mod addon_attachment;
mod app;
mod app_config_vars;
mod pipeline;
mod pipeline_coupling;
mod space;
mod space_app_access;

pub use addon::AddonHandler;
pub use addon_attachment::AddonAttachmentHandler;
pub use app::AppHandler;
pub use app_config_vars::AppConfigVarsHandler;
pub use pipeline::PipelineHandler;
pub use pipeline_coupling::PipelineCouplingHandler;
pub use space::SpaceHandler;
pub use space_app_access::SpaceAppAccessHandler;

use crate::handler::ResourceHandler;

/// All built-in handlers.
pub fn built_in() -> Vec<Box<dyn ResourceHandler>> {
    vec![
        Box::new(AppHandler),
        Box::new(AppConfigVarsHandler),
        Box::new(AddonHandler),
        Box::new(AddonAttachmentHandler),
        Box::new(PipelineHandler),
        Box::new(PipelineCouplingHandler),
        Box::new(SpaceHandler),
        Box::new(SpaceAppAccessHandler),
    ]
}

//! CLI command implementations.

pub(crate) mod install;
pub(crate) mod render;

pub(crate) use install::InstallArgs;
pub(crate) use render::RenderArgs;

pub mod api;
pub mod config;
pub mod features;
pub mod llms_txt;
pub mod metrics;
pub mod pages;
pub mod particles;
pub mod provider;
pub mod relay;
pub mod sections;
pub mod session;
pub mod throttle;

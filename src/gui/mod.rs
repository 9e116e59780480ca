mod app;
mod message;
mod widgets;

use std::sync::{Arc, Mutex};

use iced::Theme;
use image::RgbImage;

use crate::detection::DetectionPipeline;
use crate::models::Measurement;

pub use app::SamplerApp;
pub use message::Message;
pub use widgets::Stage;

/// Walk the operator through sampling and previews in one window.
///
/// Returns `None` if the window was closed before the last stage.
pub fn run(pipeline: DetectionPipeline, image: RgbImage) -> anyhow::Result<Option<Measurement>> {
    let output = Arc::new(Mutex::new(None));
    let shared = output.clone();

    iced::application(
        move || SamplerApp::new(pipeline.clone(), image.clone(), shared.clone()),
        SamplerApp::update,
        SamplerApp::view,
    )
    .title(SamplerApp::title)
    .theme(|_state: &SamplerApp| Theme::Dark)
    .subscription(SamplerApp::subscription)
    .window_size((1280.0, 900.0))
    .run()
    .map_err(|e| anyhow::anyhow!("GUI failed: {}", e))?;

    let measurement = output
        .lock()
        .map_err(|_| anyhow::anyhow!("measurement lock poisoned"))?
        .take();
    Ok(measurement)
}

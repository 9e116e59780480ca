use std::sync::{Arc, Mutex};

use iced::widget::{button, column, image as iced_image, mouse_area, scrollable, text};
use iced::{Element, Event, Length, Point, Subscription, Task, event, keyboard, window};
use image::{DynamicImage, GrayImage, RgbImage};

use super::Message;
use super::widgets::{Stage, layout};
use crate::detection::{BackgroundStage, DetectionPipeline, TargetStage, preprocessing};
use crate::error::Result;
use crate::models::{ColorSamples, Measurement, PixelPoint};
use crate::sampling::{FixedClicks, catch_colors};

pub struct SamplerApp {
    pipeline: DetectionPipeline,
    image: RgbImage,
    photo: iced_image::Handle,
    /// Mask or contour preview for the current stage
    preview: Option<iced_image::Handle>,
    stage: Stage,
    cursor: Option<Point>,
    background_point: Option<PixelPoint>,
    target_point: Option<PixelPoint>,
    colors: Option<ColorSamples>,
    hsv: Option<RgbImage>,
    target: Option<TargetStage>,
    background: Option<BackgroundStage>,
    error: Option<String>,
    output: Arc<Mutex<Option<Measurement>>>,
}

fn rgb_handle(img: &RgbImage) -> iced_image::Handle {
    let rgba = DynamicImage::ImageRgb8(img.clone()).to_rgba8();
    iced_image::Handle::from_rgba(rgba.width(), rgba.height(), rgba.into_raw())
}

fn gray_handle(img: &GrayImage) -> iced_image::Handle {
    let rgba = DynamicImage::ImageLuma8(img.clone()).to_rgba8();
    iced_image::Handle::from_rgba(rgba.width(), rgba.height(), rgba.into_raw())
}

fn on_event(event: Event, _status: event::Status, _window: window::Id) -> Option<Message> {
    match event {
        Event::Keyboard(keyboard::Event::KeyPressed { .. }) => Some(Message::Continue),
        _ => None,
    }
}

impl SamplerApp {
    pub fn new(
        pipeline: DetectionPipeline,
        image: RgbImage,
        output: Arc<Mutex<Option<Measurement>>>,
    ) -> (Self, Task<Message>) {
        let photo = rgb_handle(&image);
        (
            Self {
                pipeline,
                image,
                photo,
                preview: None,
                stage: Stage::CatchBackground,
                cursor: None,
                background_point: None,
                target_point: None,
                colors: None,
                hsv: None,
                target: None,
                background: None,
                error: None,
                output,
            },
            Task::none(),
        )
    }

    pub fn title(&self) -> String {
        self.stage.title().to_string()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        event::listen_with(on_event)
    }

    fn current_point(&self) -> Option<PixelPoint> {
        match self.stage {
            Stage::CatchBackground => self.background_point,
            Stage::CatchTarget => self.target_point,
            _ => None,
        }
    }

    fn record_click(&mut self) {
        let Some(cursor) = self.cursor else {
            return;
        };
        if cursor.x < 0.0 || cursor.y < 0.0 {
            return;
        }
        let point = PixelPoint::new(
            (cursor.x as u32).min(self.image.width() - 1),
            (cursor.y as u32).min(self.image.height() - 1),
        );
        tracing::info!("catch color at: ({}, {})", point.x, point.y);
        // later clicks overwrite the stored point
        match self.stage {
            Stage::CatchBackground => self.background_point = Some(point),
            Stage::CatchTarget => self.target_point = Some(point),
            _ => {}
        }
    }

    fn run_target(&mut self) -> Result<()> {
        let (Some(background), Some(target)) = (self.background_point, self.target_point) else {
            return Ok(());
        };
        let hsv = preprocessing::hsv_equalize(&self.image);
        let mut clicks = FixedClicks::background_then_target(background, target);
        let colors = catch_colors(&self.image, &hsv, &mut clicks)?;

        let stage = self.pipeline.contour_target(&hsv, colors.target)?;
        self.preview = Some(gray_handle(&stage.mask));
        self.colors = Some(colors);
        self.hsv = Some(hsv);
        self.target = Some(stage);
        Ok(())
    }

    fn run_background(&mut self) -> Result<()> {
        let (Some(hsv), Some(colors)) = (&self.hsv, self.colors) else {
            return Ok(());
        };
        let stage = self.pipeline.contour_background(hsv, colors.background)?;
        self.preview = Some(gray_handle(&stage.mask));
        self.background = Some(stage);
        Ok(())
    }

    fn finish(&mut self) -> Task<Message> {
        if let (Some(colors), Some(target), Some(background)) =
            (self.colors, &self.target, &self.background)
        {
            let measurement = Measurement {
                colors,
                target: target.fit,
                background: background.fit.clone(),
            };
            if let Ok(mut slot) = self.output.lock() {
                *slot = Some(measurement);
            }
        }
        iced::exit()
    }

    fn advance(&mut self) -> Task<Message> {
        if self.error.is_some() {
            return iced::exit();
        }

        let outcome = match self.stage {
            Stage::CatchBackground if self.background_point.is_some() => {
                self.stage = Stage::CatchTarget;
                Ok(())
            }
            Stage::CatchTarget if self.target_point.is_some() => {
                self.stage = Stage::TargetThreshold;
                self.run_target()
            }
            Stage::TargetThreshold => {
                self.stage = Stage::TargetContours;
                self.preview = self.target.as_ref().map(|t| gray_handle(&t.preview));
                Ok(())
            }
            Stage::TargetContours => {
                self.stage = Stage::BackgroundThreshold;
                self.run_background()
            }
            Stage::BackgroundThreshold => return self.finish(),
            // sampling stage without a click yet
            _ => Ok(()),
        };

        if let Err(e) = outcome {
            tracing::error!("{}", e);
            self.error = Some(e.to_string());
        }
        Task::none()
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::CursorMoved(position) => {
                self.cursor = Some(position);
                Task::none()
            }
            Message::Clicked => {
                if self.stage.is_sampling() {
                    self.record_click();
                }
                Task::none()
            }
            Message::Continue => self.advance(),
        }
    }

    fn sidebar(&self) -> Element<'_, Message> {
        let mut info = column![].spacing(8).padding(10);

        if let Some(error) = &self.error {
            info = info.push(text(format!("Error: {}", error)));
            info = info.push(text("Press any key to close."));
            return info.into();
        }

        if self.stage.is_sampling() {
            let hint = match self.current_point() {
                Some(p) => format!("Picked ({}, {}). Press any key.", p.x, p.y),
                None => "Click a pixel.".to_string(),
            };
            info = info.push(text(hint));
        }
        if let Some(colors) = &self.colors {
            info = info.push(text(format!("background color: {}", colors.background)));
            info = info.push(text(format!("target color: {}", colors.target)));
        }
        if let Some(target) = &self.target {
            let fit = &target.fit;
            info = info.push(text(format!(
                "target: contour {} of {}, area {:.1}",
                fit.index, fit.contour_count, fit.area
            )));
            info = info.push(text(format!(
                "center ({:.1}, {:.1}) radius {:.1}",
                fit.circle.center.0, fit.circle.center.1, fit.circle.radius
            )));
        }
        if let Some(background) = &self.background {
            info = info.push(text(format!("background contours: {}", background.fit.len())));
        }

        info.push(button("Continue").on_press(Message::Continue)).into()
    }

    pub fn view(&self) -> Element<'_, Message> {
        let (width, height) = (self.image.width() as f32, self.image.height() as f32);

        let main: Element<'_, Message> = if self.stage.is_sampling() {
            let photo = iced_image(self.photo.clone())
                .width(Length::Fixed(width))
                .height(Length::Fixed(height));
            mouse_area(photo)
                .on_move(Message::CursorMoved)
                .on_press(Message::Clicked)
                .into()
        } else {
            match &self.preview {
                Some(handle) => iced_image(handle.clone())
                    .width(Length::Fixed(width))
                    .height(Length::Fixed(height))
                    .into(),
                None => text("No preview").into(),
            }
        };

        layout(self.sidebar(), scrollable(main), self.stage)
    }
}

#[cfg(all(test, feature = "gui"))]
mod tests {
    use super::*;
    use image::Rgb;

    fn red_square_on_blue() -> RgbImage {
        RgbImage::from_fn(60, 40, |x, y| {
            if (20..40).contains(&x) && (10..30).contains(&y) {
                Rgb([255, 0, 0])
            } else {
                Rgb([0, 0, 255])
            }
        })
    }

    fn new_app(image: RgbImage) -> (SamplerApp, Arc<Mutex<Option<Measurement>>>) {
        let output = Arc::new(Mutex::new(None));
        let (app, _) = SamplerApp::new(DetectionPipeline::new(), image, output.clone());
        (app, output)
    }

    fn click(app: &mut SamplerApp, x: f32, y: f32) {
        let _ = app.update(Message::CursorMoved(Point::new(x, y)));
        let _ = app.update(Message::Clicked);
    }

    #[test]
    fn stage_waits_for_a_click() {
        let (mut app, _) = new_app(red_square_on_blue());
        let _ = app.update(Message::Continue);
        assert_eq!(app.stage, Stage::CatchBackground);

        click(&mut app, 2.0, 2.0);
        let _ = app.update(Message::Continue);
        assert_eq!(app.stage, Stage::CatchTarget);

        let _ = app.update(Message::Continue);
        assert_eq!(app.stage, Stage::CatchTarget);
    }

    #[test]
    fn later_click_overwrites_the_point() {
        let (mut app, _) = new_app(red_square_on_blue());
        click(&mut app, 2.0, 2.0);
        click(&mut app, 5.0, 7.0);
        assert_eq!(app.background_point, Some(PixelPoint::new(5, 7)));

        // clicks outside the photo are clamped to its last pixel
        click(&mut app, 500.0, 500.0);
        assert_eq!(app.background_point, Some(PixelPoint::new(59, 39)));
    }

    #[test]
    fn stages_run_in_order_and_store_the_measurement() {
        let (mut app, output) = new_app(red_square_on_blue());
        click(&mut app, 2.0, 2.0);
        let _ = app.update(Message::Continue);
        click(&mut app, 30.0, 20.0);

        let mut seen = vec![app.stage];
        for _ in 0..3 {
            let _ = app.update(Message::Continue);
            seen.push(app.stage);
        }
        assert_eq!(
            seen,
            vec![
                Stage::CatchTarget,
                Stage::TargetThreshold,
                Stage::TargetContours,
                Stage::BackgroundThreshold,
            ]
        );
        assert!(app.error.is_none());
        assert!(app.target.is_some() && app.background.is_some());

        // clicks are ignored once sampling is over
        click(&mut app, 1.0, 1.0);
        assert_eq!(app.target_point, Some(PixelPoint::new(30, 20)));

        assert!(output.lock().unwrap().is_none());
        let _ = app.update(Message::Continue);
        let measurement = output.lock().unwrap().clone().unwrap();
        assert_eq!(measurement.target.contour_count, 1);
        assert_eq!(measurement.colors.target.h, 0);
    }

    #[test]
    fn speck_target_enters_the_error_state() {
        let mut image = RgbImage::from_pixel(60, 40, Rgb([0, 0, 255]));
        image.put_pixel(30, 20, Rgb([255, 0, 0]));
        let (mut app, output) = new_app(image);

        click(&mut app, 2.0, 2.0);
        let _ = app.update(Message::Continue);
        click(&mut app, 30.0, 20.0);
        let _ = app.update(Message::Continue);

        assert_eq!(app.stage, Stage::TargetThreshold);
        assert!(app.error.as_deref().is_some_and(|e| e.contains("target")));

        // the next key press closes the window without a measurement
        let _ = app.update(Message::Continue);
        assert_eq!(app.stage, Stage::TargetThreshold);
        assert!(output.lock().unwrap().is_none());
    }
}

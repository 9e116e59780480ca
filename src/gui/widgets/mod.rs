use iced::{
    Color, Element, Theme, border,
    widget::{column, container, container::Style, container::bordered_box, row, text},
};

/// Stages of one interactive run, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    CatchBackground,
    CatchTarget,
    TargetThreshold,
    TargetContours,
    BackgroundThreshold,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::CatchBackground,
        Stage::CatchTarget,
        Stage::TargetThreshold,
        Stage::TargetContours,
        Stage::BackgroundThreshold,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Stage::CatchBackground => "catch background color",
            Stage::CatchTarget => "catch target color",
            Stage::TargetThreshold => "target threshold",
            Stage::TargetContours => "contours",
            Stage::BackgroundThreshold => "background threshold",
        }
    }

    pub fn is_sampling(self) -> bool {
        matches!(self, Stage::CatchBackground | Stage::CatchTarget)
    }

    fn style(self, other: Self) -> impl Fn(&Theme) -> Style {
        move |theme: &Theme| {
            let style = bordered_box(theme).border(border::width(5));
            // if done, gray out background
            if self >= other {
                let mut color_rgba = theme.palette().background.into_rgba8();
                color_rgba[0] /= 2;
                color_rgba[1] /= 2;
                color_rgba[2] /= 2;
                style.background(Color::from_rgb8(color_rgba[0], color_rgba[1], color_rgba[2]))
            } else {
                style.background(theme.palette().background)
            }
        }
    }
}

pub fn layout<'a, Message>(
    sidebar: impl Into<Element<'a, Message>>,
    main_content: impl Into<Element<'a, Message>>,
    stage: Stage,
) -> Element<'a, Message>
where
    Message: 'a,
{
    let steps = Stage::ALL.into_iter().fold(column![], |col, s| {
        col.push(container(text(s.title())).style(stage.style(s)).padding(10))
    });

    container(row![
        container(column![
            container(steps),
            container(sidebar.into()).height(iced::Length::Fill),
        ])
        .width(iced::Length::FillPortion(1)),
        container(main_content.into()).width(iced::Length::FillPortion(4)),
    ])
    .center_x(iced::Length::Fill)
    .center_y(iced::Length::Fill)
    .into()
}

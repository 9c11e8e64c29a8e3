use gpui::{
    App, BorderStyle, BoxShadow, Bounds, ContentMask, Corners, Edges, Font, FontWeight, PathBuilder,
    Pixels, Point, TextRun, Window, font, point, px, quad,
};

use crate::geom::{ScreenPoint, ScreenRect};
use crate::render::{Color, LineStyle, RectStyle, RenderCommand, RenderList, TextStyle};

pub(crate) const UI_FONT: &str = ".SystemUIFont";

/// Replay a canvas-local render list inside `bounds`.
pub(crate) fn paint_list(
    list: &RenderList,
    bounds: Bounds<Pixels>,
    window: &mut Window,
    cx: &mut App,
) {
    let origin = ScreenPoint::new(f32::from(bounds.origin.x), f32::from(bounds.origin.y));
    let mut clip_stack: Vec<ContentMask<Pixels>> = Vec::new();
    for command in list.commands() {
        match command {
            RenderCommand::Clear(color) => {
                window.paint_quad(quad(
                    bounds,
                    Corners::all(px(0.0)),
                    to_rgba(*color),
                    Edges::all(px(0.0)),
                    to_rgba(*color),
                    BorderStyle::default(),
                ));
            }
            RenderCommand::ClipRect(rect) => {
                clip_stack.push(ContentMask {
                    bounds: to_bounds(origin, *rect),
                });
            }
            RenderCommand::ClipEnd => {
                clip_stack.pop();
            }
            RenderCommand::FillRect { rect, color } => {
                with_clip(window, &clip_stack, |window| {
                    window.paint_quad(quad(
                        to_bounds(origin, *rect),
                        Corners::all(px(0.0)),
                        to_rgba(*color),
                        Edges::all(px(0.0)),
                        to_rgba(*color),
                        BorderStyle::default(),
                    ));
                });
            }
            RenderCommand::Line { start, end, style } => {
                with_clip(window, &clip_stack, |window| {
                    paint_polyline(window, origin, &[*start, *end], *style);
                });
            }
            RenderCommand::Polyline { points, style } => {
                with_clip(window, &clip_stack, |window| {
                    paint_polyline(window, origin, points, *style);
                });
            }
            RenderCommand::Circle {
                center,
                radius,
                color,
            } => {
                with_clip(window, &clip_stack, |window| {
                    paint_circle(window, origin, *center, *radius, *color);
                });
            }
            RenderCommand::RoundedRect {
                rect,
                radius,
                style,
            } => {
                with_clip(window, &clip_stack, |window| {
                    paint_rounded_rect(window, origin, *rect, *radius, *style);
                });
            }
            RenderCommand::Text {
                position,
                text,
                style,
            } => {
                with_clip(window, &clip_stack, |window| {
                    paint_text(window, cx, origin, *position, text, style);
                });
            }
        }
    }
}

fn paint_polyline(
    window: &mut Window,
    origin: ScreenPoint,
    points: &[ScreenPoint],
    style: LineStyle,
) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    if rest.is_empty() {
        return;
    }
    let mut builder = PathBuilder::stroke(px(style.width.max(0.5)));
    builder.move_to(at(origin, *first));
    for next in rest {
        builder.line_to(at(origin, *next));
    }
    if let Ok(path) = builder.build() {
        window.paint_path(path, to_rgba(style.color));
    }
}

fn paint_circle(
    window: &mut Window,
    origin: ScreenPoint,
    center: ScreenPoint,
    radius: f32,
    color: Color,
) {
    if radius <= 0.0 {
        return;
    }
    let rect = ScreenRect::new(
        ScreenPoint::new(center.x - radius, center.y - radius),
        ScreenPoint::new(center.x + radius, center.y + radius),
    );
    window.paint_quad(quad(
        to_bounds(origin, rect),
        Corners::all(px(radius)),
        to_rgba(color),
        Edges::all(px(0.0)),
        to_rgba(color),
        BorderStyle::default(),
    ));
}

fn paint_rounded_rect(
    window: &mut Window,
    origin: ScreenPoint,
    rect: ScreenRect,
    radius: f32,
    style: RectStyle,
) {
    let bounds = to_bounds(origin, rect);
    let corners = Corners::all(px(radius));
    if let Some(shadow) = style.shadow {
        window.paint_shadows(
            bounds,
            corners,
            &[BoxShadow {
                color: to_hsla(shadow.color),
                offset: point(px(shadow.offset.x), px(shadow.offset.y)),
                blur_radius: px(shadow.blur),
                spread_radius: px(0.0),
            }],
        );
    }
    let (border_width, border_color) = match style.stroke {
        Some(stroke) => (stroke.width, stroke.color),
        None => (0.0, Color::TRANSPARENT),
    };
    window.paint_quad(quad(
        bounds,
        corners,
        to_rgba(style.fill.unwrap_or(Color::TRANSPARENT)),
        Edges::all(px(border_width)),
        to_rgba(border_color),
        BorderStyle::default(),
    ));
}

fn paint_text(
    window: &mut Window,
    cx: &mut App,
    origin: ScreenPoint,
    position: ScreenPoint,
    text: &str,
    style: &TextStyle,
) {
    if text.is_empty() {
        return;
    }
    let run = TextRun {
        len: text.len(),
        font: ui_font(style.bold),
        color: to_hsla(style.color),
        background_color: None,
        underline: None,
        strikethrough: None,
    };
    let shaped = window
        .text_system()
        .shape_line(text.to_string().into(), px(style.size), &[run], None);
    let line_height = shaped.ascent + shaped.descent;
    // Commands anchor text at the baseline; GPUI paints from the line top.
    let anchor = at(origin, position);
    let top_left = point(anchor.x, anchor.y - shaped.ascent);
    let _ = shaped.paint(top_left, line_height, window, cx);
}

pub(crate) fn ui_font(bold: bool) -> Font {
    let mut font = font(UI_FONT);
    if bold {
        font.weight = FontWeight::BOLD;
    }
    font
}

fn at(origin: ScreenPoint, position: ScreenPoint) -> Point<Pixels> {
    point(px(origin.x + position.x), px(origin.y + position.y))
}

fn to_rgba(color: Color) -> gpui::Rgba {
    gpui::Rgba {
        r: color.r,
        g: color.g,
        b: color.b,
        a: color.a,
    }
}

pub(crate) fn to_hsla(color: Color) -> gpui::Hsla {
    gpui::Hsla::from(to_rgba(color))
}

fn to_bounds(origin: ScreenPoint, rect: ScreenRect) -> Bounds<Pixels> {
    Bounds::from_corners(at(origin, rect.min), at(origin, rect.max))
}

fn with_clip(window: &mut Window, stack: &[ContentMask<Pixels>], f: impl FnOnce(&mut Window)) {
    if let Some(mask) = stack.last() {
        window.with_content_mask(Some(mask.clone()), f);
    } else {
        f(window);
    }
}

use std::f64::consts::PI;

use graphwalk_scene::{palette, City, Surface};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

pub(super) const CANVAS_ID: &str = "canvas";
pub(super) const TIP_CANVAS_ID: &str = "tip-canvas";

pub(super) fn canvas_by_id(id: &str) -> Result<web_sys::HtmlCanvasElement, String> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or("canvas: no document".to_string())?
        .get_element_by_id(id)
        .ok_or_else(|| format!("canvas: missing #{id}"))?
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .map_err(|_| format!("canvas: #{id} is not a canvas"))
}

#[allow(deprecated)]
fn context_2d(
    canvas: &web_sys::HtmlCanvasElement,
) -> Result<web_sys::CanvasRenderingContext2d, String> {
    canvas
        .get_context("2d")
        .map_err(|_| "canvas: get_context threw".to_string())?
        .ok_or("canvas: missing 2d context".to_string())?
        .dyn_into::<web_sys::CanvasRenderingContext2d>()
        .map_err(|_| "canvas: context is not 2d".to_string())
}

/// Sizes the map canvas from the window: two thirds of the width, and a
/// height of width / 3.2. Returns the new pixel size.
pub(super) fn fit_to_window(canvas: &web_sys::HtmlCanvasElement) -> Result<(f64, f64), String> {
    let win_width = web_sys::window()
        .ok_or("canvas: no window".to_string())?
        .inner_width()
        .map_err(|_| "canvas: inner_width threw".to_string())?
        .as_f64()
        .ok_or("canvas: inner_width is not a number".to_string())?;

    let width = (win_width * (2.0 / 3.0)).floor();
    let height = (win_width / 3.2).floor();
    // Assigning a size wipes the canvas even when it is unchanged.
    if canvas.width() != width as u32 || canvas.height() != height as u32 {
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);
    }
    Ok((width, height))
}

pub(super) struct CanvasSurface {
    ctx: web_sys::CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub(super) fn new(canvas: &web_sys::HtmlCanvasElement) -> Result<Self, String> {
        Ok(Self {
            ctx: context_2d(canvas)?,
        })
    }
}

#[allow(deprecated)]
impl Surface for CanvasSurface {
    fn clear(&mut self, width: f64, height: f64) -> Result<(), String> {
        self.ctx.clear_rect(0.0, 0.0, width, height);
        Ok(())
    }

    fn line(&mut self, from: &City, to: &City, colour: &str) -> Result<(), String> {
        self.ctx.set_stroke_style(&JsValue::from_str(colour));
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.close_path();
        self.ctx.stroke();
        Ok(())
    }

    fn dot(&mut self, city: &City, colour: &str) -> Result<(), String> {
        self.ctx.set_fill_style(&JsValue::from_str(colour));
        self.ctx.begin_path();
        self.ctx.move_to(city.x, city.y);
        self.ctx
            .arc(city.x, city.y, city.radius, 0.0, PI * 2.0)
            .map_err(|_| "canvas: arc threw".to_string())?;
        self.ctx.close_path();
        self.ctx.fill();
        Ok(())
    }
}

/// Shows `text` in the tooltip canvas, centred above `city`.
pub(super) fn show_tooltip(
    map: &web_sys::HtmlCanvasElement,
    city: &City,
    text: &str,
) -> Result<(), String> {
    let tip = canvas_by_id(TIP_CANVAS_ID)?;
    let ctx = context_2d(&tip)?;

    ctx.set_font(palette::TOOLTIP_FONT);
    let text_width = ctx
        .measure_text(text)
        .map_err(|_| "tooltip: measure_text threw".to_string())?
        .width()
        + 6.0;

    let left = city.x as i64 + map.offset_left() as i64 - (text_width / 2.0) as i64;
    let top = city.y as i64 + map.offset_top() as i64 - 30;

    let style = tip.style();
    style
        .set_property("display", "block")
        .and_then(|_| style.set_property("left", &format!("{left}px")))
        .and_then(|_| style.set_property("top", &format!("{top}px")))
        .map_err(|_| "tooltip: style rejected".to_string())?;

    // Resizing resets the context, so the font is set again afterwards.
    tip.set_width(text_width.ceil() as u32);
    ctx.set_font(palette::TOOLTIP_FONT);
    ctx.clear_rect(0.0, 0.0, tip.width() as f64, tip.height() as f64);
    ctx.fill_text(text, 3.0, 15.0)
        .map_err(|_| "tooltip: fill_text threw".to_string())
}

pub(super) fn hide_tooltip() -> Result<(), String> {
    canvas_by_id(TIP_CANVAS_ID)?
        .style()
        .set_property("display", "none")
        .map_err(|_| "tooltip: style rejected".to_string())
}

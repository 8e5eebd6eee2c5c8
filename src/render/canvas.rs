//! Paints a [`Frame`] onto a 2D canvas context.
//!
//! The only module that issues `CanvasRenderingContext2d` draw calls. It reads
//! a finished frame and produces pixels; it never touches garden state.
//! Fallible canvas calls propagate through `Result<(), JsValue>`.

use std::f64::consts::TAU;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::growth::{GLOW_COLOR, SPLASH_COLOR};
use crate::sketch::{Blossom, BlossomShape, Frame, Glow, Sketch, Stroke};

/// Shadow blur behind each blossom
const BLOSSOM_BLUR: f64 = 10.0;
/// Shadow blur behind canopy particles
const CANOPY_BLUR: f64 = 8.0;
/// Shadow blur behind splash droplets
const SPLASH_BLUR: f64 = 10.0;

/// Clear the surface and draw the whole frame.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails.
pub fn paint(ctx: &CanvasRenderingContext2d, frame: &Frame) -> Result<(), JsValue> {
    ctx.clear_rect(0.0, 0.0, frame.width, frame.height);
    ctx.set_line_cap("round");

    for (sketch, glows) in &frame.trees {
        draw_sketch(ctx, sketch)?;
        draw_glows(ctx, glows, &GLOW_COLOR.css(), &GLOW_COLOR.fade(1.25).css(), CANOPY_BLUR)?;
    }

    draw_glows(ctx, &frame.splash, &SPLASH_COLOR.css(), "#50FED5", SPLASH_BLUR)?;
    Ok(())
}

fn draw_sketch(ctx: &CanvasRenderingContext2d, sketch: &Sketch) -> Result<(), JsValue> {
    // The halo only lights the branches; blossoms carry their own shadow
    match &sketch.halo {
        Some(halo) => {
            ctx.set_shadow_color(&halo.color.css());
            ctx.set_shadow_blur(halo.blur);
        }
        None => ctx.set_shadow_blur(0.0),
    }

    for stroke in &sketch.strokes {
        draw_stroke(ctx, stroke);
    }

    for blossom in &sketch.blossoms {
        draw_blossom(ctx, blossom)?;
    }
    ctx.set_shadow_blur(0.0);
    Ok(())
}

fn draw_stroke(ctx: &CanvasRenderingContext2d, stroke: &Stroke) {
    ctx.begin_path();
    ctx.move_to(stroke.from.x, stroke.from.y);
    match stroke.control {
        Some(c) => ctx.quadratic_curve_to(c.x, c.y, stroke.to.x, stroke.to.y),
        None => ctx.line_to(stroke.to.x, stroke.to.y),
    }
    ctx.set_stroke_style_str(&stroke.color.css());
    ctx.set_line_width(stroke.width);
    ctx.stroke();
}

fn draw_blossom(ctx: &CanvasRenderingContext2d, blossom: &Blossom) -> Result<(), JsValue> {
    ctx.begin_path();
    ctx.set_fill_style_str(&blossom.color.css());
    ctx.set_shadow_color(&blossom.shadow.css());
    ctx.set_shadow_blur(BLOSSOM_BLUR);

    match blossom.shape {
        BlossomShape::Square => {
            let s = blossom.size;
            ctx.rect(blossom.center.x - s, blossom.center.y - s, s * 2.0, s * 2.0);
        }
        BlossomShape::Round | BlossomShape::Petals => {
            for (center, radius) in blossom.discs() {
                ctx.move_to(center.x + radius, center.y);
                ctx.arc(center.x, center.y, radius, 0.0, TAU)?;
            }
        }
    }

    ctx.fill();
    ctx.set_shadow_blur(0.0);
    Ok(())
}

fn draw_glows(
    ctx: &CanvasRenderingContext2d,
    glows: &[Glow],
    fill: &str,
    shadow: &str,
    blur: f64,
) -> Result<(), JsValue> {
    if glows.is_empty() {
        return Ok(());
    }

    ctx.set_fill_style_str(fill);
    ctx.set_shadow_color(shadow);
    ctx.set_shadow_blur(blur);
    for glow in glows {
        ctx.set_global_alpha(glow.alpha.clamp(0.0, 1.0));
        ctx.begin_path();
        ctx.arc(glow.center.x, glow.center.y, glow.radius, 0.0, TAU)?;
        ctx.fill();
    }
    ctx.set_global_alpha(1.0);
    ctx.set_shadow_blur(0.0);
    Ok(())
}

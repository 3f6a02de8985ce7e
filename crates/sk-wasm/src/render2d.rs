//! Canvas2D presentation: blits the pixel buffer and draws selection chrome.

use sk_core::{CanvasBuffer, Rect};
use wasm_bindgen::{Clamped, JsValue};
use web_sys::{CanvasRenderingContext2d, ImageData};

const SELECTION_COLOR: &str = "#4FC3F7";
const MARQUEE_DASH: [f64; 2] = [4.0, 3.0];

/// Paint `canvas` at the origin, then the live marquee or the finished
/// selection outline on top.
pub fn render_canvas(
    ctx: &CanvasRenderingContext2d,
    canvas: &CanvasBuffer,
    marquee: Option<Rect>,
    selection: Option<Rect>,
) -> Result<(), JsValue> {
    let image = ImageData::new_with_u8_clamped_array_and_sh(
        Clamped(canvas.as_bytes()),
        canvas.width(),
        canvas.height(),
    )?;
    ctx.put_image_data(&image, 0.0, 0.0)?;

    if let Some(rect) = marquee {
        outline(ctx, rect, true)?;
    } else if let Some(rect) = selection {
        outline(ctx, rect, false)?;
    }
    Ok(())
}

fn outline(ctx: &CanvasRenderingContext2d, rect: Rect, dashed: bool) -> Result<(), JsValue> {
    let dash = js_sys::Array::new();
    if dashed {
        for d in MARQUEE_DASH {
            dash.push(&JsValue::from_f64(d));
        }
    }
    ctx.save();
    ctx.set_line_dash(&dash)?;
    ctx.set_stroke_style_str(SELECTION_COLOR);
    ctx.set_line_width(1.0);
    // Half-pixel offset keeps a 1px line on pixel centers.
    ctx.stroke_rect(
        rect.x as f64 + 0.5,
        rect.y as f64 + 0.5,
        rect.width.saturating_sub(1) as f64,
        rect.height.saturating_sub(1) as f64,
    );
    ctx.restore();
    Ok(())
}

//! Conversion of style names and paints into CSS.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// Angle used when a gradient has no usable transform
const DEFAULT_GRADIENT_ANGLE: i64 = 180;

#[derive(Debug, Deserialize)]
struct Paint {
    #[serde(rename = "type")]
    kind: String,
    color: Option<Color>,
    opacity: Option<f64>,
    #[serde(default, rename = "gradientStops")]
    gradient_stops: Vec<ColorStop>,
    #[serde(rename = "gradientTransform")]
    gradient_transform: Option<Value>,
    #[serde(rename = "imageRef")]
    image_ref: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Color {
    r: f64,
    g: f64,
    b: f64,
    a: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ColorStop {
    position: f64,
    color: Color,
}

// == Class Names ==
/// Turns a style name into a CSS class name.
///
/// Lowercases, maps spaces, slashes and underscores to hyphens, drops any
/// other non-alphanumeric character, and collapses and trims hyphens. A name
/// starting with a digit gets an `x-` prefix; `prefix` is prepended last.
/// Returns an empty string when nothing usable is left.
pub fn to_class_name(name: &str, prefix: Option<&str>) -> String {
    let mut class_name = String::with_capacity(name.len());
    for c in name.trim().to_lowercase().chars() {
        if c == '/' || c == '_' || c == '-' || c.is_whitespace() {
            if !class_name.ends_with('-') {
                class_name.push('-');
            }
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
            class_name.push(c);
        }
    }

    let mut class_name = class_name.trim_matches('-').to_string();
    if class_name.is_empty() {
        return class_name;
    }
    if class_name.starts_with(|c: char| c.is_ascii_digit()) {
        class_name.insert_str(0, "x-");
    }
    match prefix.filter(|prefix| !prefix.is_empty()) {
        Some(prefix) => format!("{}-{}", prefix, class_name),
        None => class_name,
    }
}

// == Paints ==
/// Renders one paint object as a CSS background value.
///
/// Supports solid colors, linear/radial/angular/diamond gradients and image
/// references. Returns `None` for other paint types or malformed paints.
pub fn fill_to_css(fill: &Value) -> Option<String> {
    let paint = Paint::deserialize(fill).ok()?;
    match paint.kind.as_str() {
        "SOLID" => {
            let color = paint.color?;
            Some(format!(
                "rgba({}, {}, {}, {})",
                channel(color.r),
                channel(color.g),
                channel(color.b),
                paint.opacity.unwrap_or(1.0)
            ))
        }
        "GRADIENT_LINEAR" | "GRADIENT_RADIAL" | "GRADIENT_ANGULAR" | "GRADIENT_DIAMOND" => {
            gradient_to_css(&paint)
        }
        "IMAGE" => paint.image_ref.map(|image| format!("url({})", image)),
        _ => None,
    }
}

fn gradient_to_css(paint: &Paint) -> Option<String> {
    if paint.gradient_stops.is_empty() {
        return None;
    }

    let mut stops: Vec<&ColorStop> = paint.gradient_stops.iter().collect();
    stops.sort_by(|a, b| a.position.total_cmp(&b.position));
    let stops = stops
        .iter()
        .map(|stop| {
            let color = &stop.color;
            format!(
                "rgba({}, {}, {}, {}) {}%",
                channel(color.r.clamp(0.0, 1.0)),
                channel(color.g.clamp(0.0, 1.0)),
                channel(color.b.clamp(0.0, 1.0)),
                color.a.unwrap_or(1.0).clamp(0.0, 1.0),
                (stop.position * 10000.0).round() / 100.0
            )
        })
        .collect::<Vec<_>>()
        .join(", ");

    let transform = paint.gradient_transform.as_ref();
    let css = match paint.kind.as_str() {
        "GRADIENT_LINEAR" => format!("linear-gradient({}deg, {})", gradient_angle(transform), stops),
        "GRADIENT_RADIAL" => format!(
            "radial-gradient(circle at {}, {})",
            gradient_position(transform),
            stops
        ),
        "GRADIENT_ANGULAR" => format!(
            "conic-gradient(from {}deg, {})",
            gradient_angle(transform),
            stops
        ),
        _ => {
            warn!("Diamond gradients have no CSS equivalent, using a radial gradient");
            format!(
                "radial-gradient(circle at {}, {})",
                gradient_position(transform),
                stops
            )
        }
    };
    Some(css)
}

/// Scales a 0..1 color channel to 0..255.
fn channel(value: f64) -> i64 {
    (value * 255.0).round() as i64
}

/// The two rows of a 2x3 affine transform.
fn transform_rows(transform: Option<&Value>) -> Option<(&Vec<Value>, &Vec<Value>)> {
    match transform?.as_array()?.as_slice() {
        [first, second] => Some((first.as_array()?, second.as_array()?)),
        _ => None,
    }
}

fn gradient_angle(transform: Option<&Value>) -> i64 {
    let Some((first, _)) = transform_rows(transform) else {
        return DEFAULT_GRADIENT_ANGLE;
    };
    let (Some(a), Some(b)) = (
        first.first().and_then(Value::as_f64),
        first.get(1).and_then(Value::as_f64),
    ) else {
        return DEFAULT_GRADIENT_ANGLE;
    };

    let angle = b.atan2(a).to_degrees().rem_euclid(360.0);
    (90.0 - angle).rem_euclid(360.0).round() as i64
}

fn gradient_position(transform: Option<&Value>) -> String {
    let Some((first, second)) = transform_rows(transform) else {
        return "50% 50%".to_string();
    };
    let percent = |row: &Vec<Value>| {
        let offset = row.get(2).and_then(Value::as_f64).unwrap_or(0.5);
        (offset * 100.0).round().clamp(0.0, 100.0) as i64
    };
    format!("{}% {}%", percent(first), percent(second))
}

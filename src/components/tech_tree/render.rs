use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::TechTreeState;
use crate::data::ConnectionType;
use crate::engine::coords::format_year;
use crate::engine::{Point, Viewport};
use crate::engine::curve::ConnectionCurve;

/// Node box width in layout units.
pub const NODE_WIDTH: f64 = 160.0;
/// Node box height in layout units.
pub const NODE_HEIGHT: f64 = 64.0;
const ARROW_LENGTH: f64 = 10.0;

/// Stroke colour, width and dash pattern of a connection type.
pub fn connection_style(kind: ConnectionType) -> (&'static str, f64, &'static [f64]) {
	match kind {
		ConnectionType::Prerequisite => ("#FCA5A5", 3.0, &[]),
		ConnectionType::Improvement => ("#93C5FD", 2.0, &[]),
		ConnectionType::Speculative => ("#FCD34D", 2.0, &[5.0, 5.0]),
		ConnectionType::Inspiration => ("#86EFAC", 2.0, &[3.0, 3.0]),
		ConnectionType::Component => ("#C4B5FD", 2.0, &[]),
		ConnectionType::IndependentlyInvented => ("#6EE7B7", 2.0, &[10.0, 3.0]),
		ConnectionType::ConcurrentDevelopment => ("#6EE7B7", 2.0, &[10.0, 3.0]),
		ConnectionType::LinkPlausibleButUnclear => ("#D1D5DB", 2.0, &[2.0, 4.0]),
		ConnectionType::Obsolescence => ("#9CA3AF", 2.0, &[6.0, 2.0, 2.0, 2.0]),
		ConnectionType::Default => ("#6B7280", 2.0, &[]),
	}
}

fn set_dash(ctx: &CanvasRenderingContext2d, pattern: &[f64]) {
	let array = js_sys::Array::new();
	for &value in pattern {
		array.push(&JsValue::from_f64(value));
	}
	let _ = ctx.set_line_dash(&array);
}

/// Draw the visible connections and nodes, the tooltip and the stats line.
pub fn render(state: &TechTreeState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#f8fafc");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	let transform = state.transform;
	ctx.save();
	let _ = ctx.translate(-transform.scroll_left, -transform.scroll_top);
	let _ = ctx.scale(transform.zoom, transform.zoom);
	draw_connections(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();

	draw_tooltip(state, ctx);
	draw_stats(state, ctx);
}

fn draw_connections(state: &TechTreeState, ctx: &CanvasRenderingContext2d) {
	let highlighting = state.hover.node.is_some();
	for &connection in &state.visible.connections {
		let (Some(link), Some(curve)) = (
			state.session.links().get(connection),
			state.session.curve(connection),
		) else {
			continue;
		};
		let (color, width, dash) = connection_style(link.kind);
		let lit = state.is_highlighted(&link.source) && state.is_highlighted(&link.target);
		let selected = state.selection.link() == Some(connection);
		let emphasis = match (highlighting, lit) {
			(false, _) => 0.8,
			(true, true) => 1.0,
			(true, false) => 0.15,
		};
		ctx.set_global_alpha(emphasis * state.link_opacity(connection));
		ctx.set_stroke_style_str(color);
		ctx.set_line_width(if lit || selected { width * 1.5 } else { width });
		set_dash(ctx, dash);
		stroke_curve(ctx, &curve);

		set_dash(ctx, &[]);
		ctx.set_fill_style_str(color);
		draw_arrowhead(ctx, &curve);
	}
	ctx.set_global_alpha(1.0);
}

fn stroke_curve(ctx: &CanvasRenderingContext2d, curve: &ConnectionCurve) {
	ctx.begin_path();
	ctx.move_to(curve.start.x, curve.start.y);
	ctx.bezier_curve_to(
		curve.control1.x,
		curve.control1.y,
		curve.control2.x,
		curve.control2.y,
		curve.end.x,
		curve.end.y,
	);
	ctx.stroke();
}

fn draw_arrowhead(ctx: &CanvasRenderingContext2d, curve: &ConnectionCurve) {
	let angle = curve.end_angle();
	let tip = curve.end;
	ctx.begin_path();
	ctx.move_to(tip.x, tip.y);
	ctx.line_to(
		tip.x - ARROW_LENGTH * (angle - PI / 6.0).cos(),
		tip.y - ARROW_LENGTH * (angle - PI / 6.0).sin(),
	);
	ctx.line_to(
		tip.x - ARROW_LENGTH * (angle + PI / 6.0).cos(),
		tip.y - ARROW_LENGTH * (angle + PI / 6.0).sin(),
	);
	ctx.close_path();
	ctx.fill();
}

fn card_bounds(center: Point) -> Viewport {
	Viewport::from_origin_size(
		center.x - NODE_WIDTH / 2.0,
		center.y - NODE_HEIGHT / 2.0,
		NODE_WIDTH,
		NODE_HEIGHT,
	)
}

fn draw_nodes(state: &TechTreeState, ctx: &CanvasRenderingContext2d) {
	let highlighting = state.hover.node.is_some();
	ctx.set_text_align("center");
	for id in &state.visible.nodes {
		let Some(positioned) = state.session.node(id) else {
			continue;
		};
		let card = card_bounds(positioned.position);
		let lit = state.is_highlighted(id);
		let hovered = state.hover.node.as_deref() == Some(id.as_str());
		let selected = state.selection.node_id() == Some(id.as_str());

		let emphasis = if highlighting && !lit { 0.35 } else { 1.0 };
		ctx.set_global_alpha(emphasis * state.node_opacity(id));
		ctx.set_fill_style_str(if selected { "#eff6ff" } else { "#ffffff" });
		ctx.fill_rect(card.left, card.top, card.width(), card.height());
		ctx.set_stroke_style_str(if hovered || selected { "#2563eb" } else { "#1f2937" });
		ctx.set_line_width(if selected { 3.0 } else if hovered { 2.5 } else { 1.0 });
		ctx.stroke_rect(card.left, card.top, card.width(), card.height());

		let node = &positioned.node;
		ctx.set_fill_style_str("#111827");
		ctx.set_font("bold 13px sans-serif");
		let _ = ctx.fill_text_with_max_width(
			&node.title,
			positioned.position.x,
			card.top + 24.0,
			NODE_WIDTH - 12.0,
		);
		ctx.set_fill_style_str("#6b7280");
		ctx.set_font("11px sans-serif");
		let _ = ctx.fill_text(
			&format_year(node.year, false),
			positioned.position.x,
			card.top + 44.0,
		);
	}
	ctx.set_global_alpha(1.0);
	ctx.set_text_align("start");
}

/// Details of the hovered node, or of the selected one when nothing is hovered.
fn draw_tooltip(state: &TechTreeState, ctx: &CanvasRenderingContext2d) {
	let Some(positioned) = state
		.hover
		.node
		.as_deref()
		.or(state.selection.node_id())
		.and_then(|id| state.session.node(id))
	else {
		return;
	};
	let node = &positioned.node;
	let anchor = state.transform.layout_to_screen(Point::new(
		positioned.position.x,
		positioned.position.y - NODE_HEIGHT / 2.0,
	));

	let mut lines = vec![node.title.clone(), format_year(node.year, false)];
	lines.extend(node.subtitle.clone());
	if !node.fields.is_empty() {
		lines.push(node.fields.join(", "));
	}
	if !node.inventors.is_empty() {
		lines.push(node.inventors.join(", "));
	}
	if !node.countries.is_empty() {
		lines.push(node.countries.join(", "));
	}

	let (width, line_height) = (240.0, 16.0);
	let height = lines.len() as f64 * line_height + 12.0;
	let left = (anchor.x - width / 2.0).clamp(4.0, (state.width - width - 4.0).max(4.0));
	let top = (anchor.y - height - 8.0).max(4.0);

	ctx.set_fill_style_str("rgba(17, 24, 39, 0.92)");
	ctx.fill_rect(left, top, width, height);
	ctx.set_fill_style_str("#ffffff");
	ctx.set_font("12px sans-serif");
	for (i, line) in lines.iter().enumerate() {
		let _ = ctx.fill_text_with_max_width(
			line,
			left + 8.0,
			top + 18.0 + i as f64 * line_height,
			width - 16.0,
		);
	}
}

fn draw_stats(state: &TechTreeState, ctx: &CanvasRenderingContext2d) {
	let stats = state.visible.stats;
	let text = format!(
		"{} nodes, {} connections (viewport {}, node {}, pinned {}, sticky {})",
		state.visible.nodes.len(),
		state.visible.connections.len(),
		stats.viewport_connections,
		stats.node_connections,
		stats.pinned_connections,
		stats.sticky_connections,
	);
	ctx.set_fill_style_str("rgba(55, 65, 81, 0.7)");
	ctx.set_font("11px monospace");
	let _ = ctx.fill_text(&text, 8.0, state.height - 8.0);
}

/// Draw every node as a dot, the year labels and the viewport indicator.
pub fn render_minimap(state: &TechTreeState, ctx: &CanvasRenderingContext2d) {
	let label_height = state.config.minimap.label_height;
	let height = state.minimap_height();
	ctx.set_fill_style_str("#e5e7eb");
	ctx.fill_rect(0.0, 0.0, state.width, height);

	ctx.set_fill_style_str("#374151");
	ctx.set_font("9px sans-serif");
	for (x, text) in &state.year_labels {
		let _ = ctx.fill_text(text, *x, label_height - 1.0);
	}

	for positioned in state.session.nodes() {
		let dot = state.minimap.layout_to_minimap(positioned.position);
		let dimmed = state.node_opacity(&positioned.node.id) < 1.0;
		ctx.set_fill_style_str(if dimmed { "#cbd5e1" } else { "#4b5563" });
		ctx.fill_rect(dot.x - 1.0, label_height + dot.y - 1.0, 2.0, 2.0);
	}

	if let Some(visible) = state.viewport_input().strict_viewport() {
		let indicator = state.minimap.viewport_indicator(&visible);
		ctx.set_fill_style_str("rgba(37, 99, 235, 0.15)");
		ctx.fill_rect(
			indicator.left,
			label_height + indicator.top,
			indicator.width(),
			indicator.height(),
		);
		ctx.set_stroke_style_str("#2563eb");
		ctx.set_line_width(1.0);
		ctx.stroke_rect(
			indicator.left,
			label_height + indicator.top,
			indicator.width(),
			indicator.height(),
		);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn speculative_and_inspiration_links_are_dashed() {
		assert!(!connection_style(ConnectionType::Speculative).2.is_empty());
		assert!(!connection_style(ConnectionType::Inspiration).2.is_empty());
		assert!(connection_style(ConnectionType::Prerequisite).2.is_empty());
		assert_eq!(connection_style(ConnectionType::Prerequisite).1, 3.0);
	}

	#[test]
	fn cards_are_centred_on_the_node() {
		let card = card_bounds(Point::new(260.0, 520.0));
		assert_eq!(card, Viewport::new(180.0, 488.0, 340.0, 552.0));
	}
}

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, WheelEvent, Window,
};

use super::drag::DragSession;
use super::render;
use super::state::TechTreeState;
use crate::config::TreeConfig;
use crate::data::{GraphData, NodeFilter};

fn window_size(window: &Window) -> (f64, f64) {
	let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0);
	let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0);
	(width, height)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok().flatten()?.dyn_into().ok()
}

/// Pointer position relative to the canvas' top-left corner.
fn pointer_in(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Size the main canvas and the minimap strip above it to fill the window.
fn layout_canvases(
	window: &Window,
	main: &HtmlCanvasElement,
	minimap: &HtmlCanvasElement,
	config: &TreeConfig,
) -> (f64, f64) {
	let (width, height) = window_size(window);
	let minimap_height = config.minimap.total_height(width);
	let main_height = (height - minimap_height).max(0.0);
	minimap.set_width(width as u32);
	minimap.set_height(minimap_height as u32);
	main.set_width(width as u32);
	main.set_height(main_height as u32);
	(width, main_height)
}

/// Timeline canvas with a minimap strip above it.
///
/// `data` reloads the layout, `filter` only dims, and every new `search`
/// query jumps to its best match.
#[component]
pub fn TechTreeCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(into)] filter: Signal<NodeFilter>,
	#[prop(into)] search: Signal<String>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let minimap_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<TechTreeState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let drag: Rc<RefCell<Option<DragSession>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	let state_filter = state.clone();
	Effect::new(move |_| {
		filter.with(|filter| {
			if let Some(ref mut s) = *state_filter.borrow_mut() {
				s.set_filter(filter);
			}
		});
	});

	let state_search = state.clone();
	Effect::new(move |_| {
		let query = search.get();
		if let Some(ref mut s) = *state_search.borrow_mut() {
			if s.apply_search(&query).is_none() && !query.trim().is_empty() {
				info!("No match for {query:?}");
			}
		}
	});

	Effect::new(move |_| {
		let data = data.get();
		if let Some(ref mut s) = *state_init.borrow_mut() {
			s.reload(&data);
			return;
		}

		let (Some(canvas), Some(minimap)) = (canvas_ref.get(), minimap_ref.get()) else {
			return;
		};
		let (canvas, minimap): (HtmlCanvasElement, HtmlCanvasElement) =
			(canvas.into(), minimap.into());
		let Some(window) = web_sys::window() else {
			return;
		};
		let (Some(ctx), Some(minimap_ctx)) = (context_2d(&canvas), context_2d(&minimap)) else {
			warn!("2d canvas context unavailable");
			return;
		};

		let config = TreeConfig::default();
		let (w, h) = layout_canvases(&window, &canvas, &minimap, &config);
		let filter = filter.get_untracked();
		*state_init.borrow_mut() = Some(TechTreeState::new(&data, &filter, config, w, h));

		let (state_resize, canvas_resize, minimap_resize) =
			(state_init.clone(), canvas.clone(), minimap.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let Some(win) = web_sys::window() else {
				return;
			};
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				let (nw, nh) = layout_canvases(&win, &canvas_resize, &minimap_resize, &s.config);
				s.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.refresh_visibility();
				render::render(s, &ctx);
				render::render_minimap(s, &minimap_ctx);
			}
			if let (Some(win), Some(cb)) = (web_sys::window(), animate_inner.borrow().as_ref()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = pointer_in(&canvas, &ev);
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.start_pan(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = pointer_in(&canvas, &ev);
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.pan.active {
				s.pan_to_screen(x, y);
			} else {
				s.set_hover_at(x, y);
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = pointer_in(&canvas, &ev);
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.finish_pan(x, y);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pan.active = false;
			s.clear_hover();
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = pointer_in(&canvas, &ev);
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			if ev.ctrl_key() || ev.meta_key() {
				let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
				s.zoom_at(x, y, factor);
			} else if ev.shift_key() {
				s.pan_by(ev.delta_y(), 0.0);
			} else {
				s.pan_by(ev.delta_x(), ev.delta_y());
			}
		}
	};

	let state_key = state.clone();
	let on_keydown = move |ev: KeyboardEvent| {
		if let Some(ref mut s) = *state_key.borrow_mut() {
			match ev.key().as_str() {
				"a" | "A" => s.toggle_ancestors(),
				"d" | "D" => s.toggle_descendants(),
				"Escape" => s.clear_selection(),
				_ => return,
			}
			ev.prevent_default();
		}
	};

	let (state_mini, drag_mini) = (state.clone(), drag.clone());
	let on_minimap_down = move |ev: MouseEvent| {
		ev.prevent_default();
		let Some(minimap) = minimap_ref.get() else {
			return;
		};
		let minimap: HtmlCanvasElement = minimap.into();
		let label_height = {
			let mut guard = state_mini.borrow_mut();
			let Some(s) = guard.as_mut() else {
				return;
			};
			let label_height = s.config.minimap.label_height;
			let (x, y) = pointer_in(&minimap, &ev);
			s.minimap_drag.begin();
			s.minimap_pointer(x, y - label_height);
			label_height
		};
		let Some(window) = web_sys::window() else {
			return;
		};

		let (state_move, state_up, drag_up) =
			(state_mini.clone(), state_mini.clone(), drag_mini.clone());
		let session = DragSession::start(
			window,
			move |ev: MouseEvent| {
				let (x, y) = pointer_in(&minimap, &ev);
				if let Some(ref mut s) = *state_move.borrow_mut() {
					s.minimap_pointer(x, y - label_height);
				}
			},
			move |_: MouseEvent| {
				if let Some(ref mut s) = *state_up.borrow_mut() {
					s.minimap_drag.end();
				}
				let finished = drag_up.borrow_mut().take();
				drop(finished);
			},
		);
		match session {
			Ok(session) => *drag_mini.borrow_mut() = Some(session),
			Err(err) => {
				warn!("Could not track minimap drag: {:?}", err);
				if let Some(ref mut s) = *state_mini.borrow_mut() {
					s.minimap_drag.end();
				}
			}
		}
	};

	view! {
		<div class="tech-tree" style="display: flex; flex-direction: column;">
			<canvas
				node_ref=minimap_ref
				class="tech-tree-minimap"
				on:mousedown=on_minimap_down
				style="display: block; cursor: pointer;"
			/>
			<canvas
				node_ref=canvas_ref
				class="tech-tree-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				on:keydown=on_keydown
				tabindex="0"
				style="display: block; cursor: grab; outline: none;"
			/>
		</div>
	}
}

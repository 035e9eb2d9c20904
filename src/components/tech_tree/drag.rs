use wasm_bindgen::prelude::*;
use web_sys::{MouseEvent, Window};

type MouseHandler = Closure<dyn FnMut(MouseEvent)>;

/// Window-level `mousemove`/`mouseup` listeners that live exactly as long as
/// one drag. Releasing the button outside the minimap still ends the drag.
///
/// Dropping the session unregisters both listeners.
pub struct DragSession {
	window: Window,
	on_move: MouseHandler,
	on_up: MouseHandler,
}

impl DragSession {
	/// Listen on the window until the button is released.
	pub fn start(
		window: Window,
		on_move: impl FnMut(MouseEvent) + 'static,
		on_up: impl FnMut(MouseEvent) + 'static,
	) -> Result<Self, JsValue> {
		let on_move: MouseHandler = Closure::new(on_move);
		let on_up: MouseHandler = Closure::new(on_up);
		window.add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref())?;
		if let Err(err) =
			window.add_event_listener_with_callback("mouseup", on_up.as_ref().unchecked_ref())
		{
			let _ = window
				.remove_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref());
			return Err(err);
		}
		Ok(Self {
			window,
			on_move,
			on_up,
		})
	}
}

impl Drop for DragSession {
	fn drop(&mut self) {
		let _ = self.window.remove_event_listener_with_callback(
			"mousemove",
			self.on_move.as_ref().unchecked_ref(),
		);
		let _ = self
			.window
			.remove_event_listener_with_callback("mouseup", self.on_up.as_ref().unchecked_ref());
	}
}

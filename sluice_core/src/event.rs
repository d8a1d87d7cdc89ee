// Copyright 2026 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Events delivered by the native event source.
//!
//! The core never decodes OS input itself. Native collaborators translate
//! their platform events into [`NativeEvent`] values, which the pump adapter
//! routes to the matching handler without reordering them.

use alloc::string::String;

use kurbo::{Point, Size, Vec2};

/// Opaque identifier for a native window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowId(pub u64);

/// Opaque identifier for an input device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeviceId(pub u64);

/// Pressed or released.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementState {
    /// The button or key went down.
    Pressed,
    /// The button or key went up.
    Released,
}

/// A mouse button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button.
    Left,
    /// Secondary button.
    Right,
    /// Wheel button.
    Middle,
    /// Back navigation button.
    Back,
    /// Forward navigation button.
    Forward,
    /// Any other button, by platform index.
    Other(u16),
}

/// Scroll amount reported by a wheel or touchpad.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MouseScrollDelta {
    /// Scroll in lines (columns, rows).
    LineDelta(Vec2),
    /// Scroll in logical pixels.
    PixelDelta(Vec2),
}

/// An event targeting one window.
#[derive(Clone, Debug, PartialEq)]
pub enum WindowEvent {
    /// The inner size changed.
    Resized(Size),
    /// The window moved on screen.
    Moved(Point),
    /// The user asked to close the window.
    CloseRequested,
    /// The window was destroyed.
    Destroyed,
    /// Keyboard focus was gained (`true`) or lost (`false`).
    Focused(bool),
    /// A key changed state while the window had focus.
    KeyboardInput {
        /// Source device.
        device_id: DeviceId,
        /// Platform scan code.
        physical_key: u32,
        /// New key state.
        state: ElementState,
        /// `true` for auto-repeat presses.
        repeat: bool,
    },
    /// The cursor moved inside the window.
    CursorMoved {
        /// Source device.
        device_id: DeviceId,
        /// Position relative to the top-left of the client area.
        position: Point,
    },
    /// The cursor entered the window.
    CursorEntered {
        /// Source device.
        device_id: DeviceId,
    },
    /// The cursor left the window.
    CursorLeft {
        /// Source device.
        device_id: DeviceId,
    },
    /// A wheel or touchpad scrolled.
    MouseWheel {
        /// Source device.
        device_id: DeviceId,
        /// Scroll amount.
        delta: MouseScrollDelta,
    },
    /// A mouse button changed state.
    MouseInput {
        /// Source device.
        device_id: DeviceId,
        /// New button state.
        state: ElementState,
        /// Which button.
        button: MouseButton,
    },
    /// The display scale factor for the window changed.
    ScaleFactorChanged(f64),
    /// The window became fully hidden (`true`) or visible again (`false`).
    Occluded(bool),
    /// The native side wants the window contents redrawn.
    ///
    /// Delivered at most once per native redraw signal.
    RedrawRequested,
}

/// Raw device input, independent of window focus.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DeviceEvent {
    /// A device was connected.
    Added,
    /// A device was disconnected.
    Removed,
    /// Relative pointer motion.
    MouseMotion {
        /// Unfiltered motion delta.
        delta: Vec2,
    },
    /// Raw wheel motion.
    MouseWheel {
        /// Scroll amount.
        delta: MouseScrollDelta,
    },
    /// A raw button changed state.
    Button {
        /// Platform button index.
        button: u32,
        /// New button state.
        state: ElementState,
    },
    /// A raw key changed state.
    Key {
        /// Platform scan code.
        physical_key: u32,
        /// New key state.
        state: ElementState,
    },
}

/// When the native source should report [`DeviceEvent`]s.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum DeviceEvents {
    /// Always report device events.
    Always,
    /// Only while one of the loop's windows has focus.
    #[default]
    WhenFocused,
    /// Never report device events.
    Never,
}

/// One event in a native batch.
///
/// `T` is the payload type for application-defined user events.
#[derive(Clone, Debug, PartialEq)]
pub enum NativeEvent<T> {
    /// An event for one window.
    Window {
        /// Target window.
        window_id: WindowId,
        /// The event.
        event: WindowEvent,
    },
    /// Raw device input.
    Device {
        /// Source device.
        device_id: DeviceId,
        /// The event.
        event: DeviceEvent,
    },
    /// An application-defined event sent through a proxy.
    User(T),
    /// The application may create native resources again.
    Resumed,
    /// The application must release native resources.
    Suspended,
    /// The OS is low on memory.
    MemoryWarning,
}

/// Parameters for [`create_window`](crate::native::NativeControl::create_window).
#[derive(Clone, Debug, PartialEq)]
pub struct WindowAttributes {
    /// Title bar text.
    pub title: String,
    /// Requested client-area size, if any.
    pub inner_size: Option<Size>,
    /// Smallest allowed client-area size.
    pub min_inner_size: Option<Size>,
    /// Largest allowed client-area size.
    pub max_inner_size: Option<Size>,
    /// Requested screen position, if any.
    pub position: Option<Point>,
    /// Whether the user may resize the window.
    pub resizable: bool,
    /// Whether the window is initially shown.
    pub visible: bool,
}

impl Default for WindowAttributes {
    fn default() -> Self {
        Self {
            title: String::from("sluice window"),
            inner_size: None,
            min_inner_size: None,
            max_inner_size: None,
            position: None,
            resizable: true,
            visible: true,
        }
    }
}

impl WindowAttributes {
    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the requested client-area size.
    #[must_use]
    pub fn with_inner_size(mut self, size: Size) -> Self {
        self.inner_size = Some(size);
        self
    }

    /// Sets the minimum client-area size.
    #[must_use]
    pub fn with_min_inner_size(mut self, size: Size) -> Self {
        self.min_inner_size = Some(size);
        self
    }

    /// Sets the maximum client-area size.
    #[must_use]
    pub fn with_max_inner_size(mut self, size: Size) -> Self {
        self.max_inner_size = Some(size);
        self
    }

    /// Sets the requested screen position.
    #[must_use]
    pub fn with_position(mut self, position: Point) -> Self {
        self.position = Some(position);
        self
    }

    /// Sets whether the window is resizable.
    #[must_use]
    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    /// Sets whether the window is initially visible.
    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Returns the requested size clamped to the min/max constraints.
    #[must_use]
    pub fn constrained_size(&self, fallback: Size) -> Size {
        let mut size = self.inner_size.unwrap_or(fallback);
        if let Some(min) = self.min_inner_size {
            size = Size::new(size.width.max(min.width), size.height.max(min.height));
        }
        if let Some(max) = self.max_inner_size {
            size = Size::new(size.width.min(max.width), size.height.min(max.height));
        }
        size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_builder_sets_fields() {
        let attrs = WindowAttributes::default()
            .with_title("demo")
            .with_inner_size(Size::new(640.0, 480.0))
            .with_position(Point::new(10.0, 20.0))
            .with_resizable(false)
            .with_visible(false);
        assert_eq!(attrs.title, "demo");
        assert_eq!(attrs.inner_size, Some(Size::new(640.0, 480.0)));
        assert_eq!(attrs.position, Some(Point::new(10.0, 20.0)));
        assert!(!attrs.resizable, "resizable cleared");
        assert!(!attrs.visible, "visible cleared");
    }

    #[test]
    fn constrained_size_respects_bounds() {
        let attrs = WindowAttributes::default()
            .with_inner_size(Size::new(50.0, 5_000.0))
            .with_min_inner_size(Size::new(100.0, 100.0))
            .with_max_inner_size(Size::new(1_000.0, 1_000.0));
        assert_eq!(
            attrs.constrained_size(Size::ZERO),
            Size::new(100.0, 1_000.0)
        );
    }

    #[test]
    fn constrained_size_uses_fallback() {
        let attrs = WindowAttributes::default();
        assert_eq!(
            attrs.constrained_size(Size::new(800.0, 600.0)),
            Size::new(800.0, 600.0)
        );
    }
}

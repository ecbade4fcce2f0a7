// SPDX-License-Identifier: MIT

pub mod headless;
pub mod render;

pub use headless::{HeadlessRenderer, RenderOp, RenderStats};
pub use render::{PanelHandle, Renderer, WidgetHandle, WidgetSpec};

//! Configuration section definitions.
//!
//! Each module corresponds to a section in `minstamp.toml`:
//!
//! | Module    | TOML Section       | Purpose                               |
//! |-----------|--------------------|---------------------------------------|
//! | `hooks`   | `[[hooks.between]]`| Commands run between capture & apply  |
//! | `pattern` | `[[patterns]]`     | Reference extraction patterns         |
//! | `target`  | `[[targets]]`      | Named template sets                   |

mod hooks;
mod pattern;
mod target;

pub use hooks::{HookConfig, HooksConfig};
pub use pattern::PatternConfig;
pub use target::TargetConfig;

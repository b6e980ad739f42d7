use std::str::FromStr;

use async_trait::async_trait;
use shared::{
    domain::{ButtonCode, Dimensions, KeyCode},
    error::{InjectionError, InjectionOp},
};
use tokio::process::Command;
use tracing::{debug, info};

use crate::{InjectionPort, InjectionResult};

pub const DEFAULT_PROGRAM: &str = "xdotool";

/// Which surface the quadrants are laid over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowTarget {
    /// The whole display.
    Display,
    /// A known X11 window id.
    Window(u64),
    /// Let the user click the window to drive (`xdotool selectwindow`).
    Select,
}

impl FromStr for WindowTarget {
    type Err = InjectionError;

    /// Accepts `display`, `select`, a decimal id or a `0x`-prefixed hex id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "" | "display" | "root" => return Ok(WindowTarget::Display),
            "select" => return Ok(WindowTarget::Select),
            _ => {}
        }
        parse_window_id(s).map(WindowTarget::Window)
    }
}

fn parse_window_id(raw: &str) -> Result<u64, InjectionError> {
    let raw = raw.trim();
    let parsed = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => raw.parse(),
    };
    parsed.map_err(|_| InjectionError::Geometry(format!("invalid window id '{raw}'")))
}

/// X11 injection through the `xdotool` command-line tool.
pub struct XdotoolPort {
    program: String,
    window: Option<u64>,
    dimensions: Dimensions,
}

impl XdotoolPort {
    /// Resolves the target, focuses it when it is a window and queries its
    /// geometry. Without geometry there is no frame of reference for cursor
    /// placement, so failure here is fatal to callers.
    pub async fn connect(
        program: impl Into<String>,
        target: WindowTarget,
    ) -> Result<Self, InjectionError> {
        let program = program.into();
        let window = match target {
            WindowTarget::Display => None,
            WindowTarget::Window(id) => Some(id),
            WindowTarget::Select => {
                info!("click the window to drive");
                let raw = query(&program, &["selectwindow"]).await?;
                Some(parse_window_id(&raw)?)
            }
        };

        let dimensions = match window {
            Some(id) => {
                let id = id.to_string();
                let raw = query(&program, &["getwindowgeometry", "--shell", &id]).await?;
                parse_window_geometry(&raw)?
            }
            None => parse_geometry(&query(&program, &["getdisplaygeometry"]).await?)?,
        };

        let port = Self {
            program,
            window,
            dimensions,
        };
        if let Some(id) = window {
            port.run(
                InjectionOp::Focus,
                &["windowfocus".into(), "--sync".into(), id.to_string()],
            )
            .await?;
        }
        info!(
            window = ?port.window,
            width = dimensions.width,
            height = dimensions.height,
            "connected to display"
        );
        Ok(port)
    }

    pub fn window(&self) -> Option<u64> {
        self.window
    }

    async fn run(&self, op: InjectionOp, args: &[String]) -> InjectionResult {
        debug!(op = op.as_str(), ?args, "xdotool");
        let output = Command::new(&self.program)
            .args(args)
            .output()
            .await
            .map_err(|source| InjectionError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        if output.status.success() {
            return Ok(());
        }
        Err(InjectionError::CommandFailed {
            op,
            message: format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        })
    }

    /// `mousemove` arguments; coordinates are window-relative when a window
    /// is targeted.
    fn move_args(&self, x: f64, y: f64) -> Vec<String> {
        let mut args = vec!["mousemove".to_string()];
        if let Some(id) = self.window {
            args.extend(["--window".to_string(), id.to_string()]);
        }
        args.extend([pixel(x), pixel(y)]);
        args
    }
}

/// Runs a read-only xdotool query and returns its stdout.
async fn query(program: &str, args: &[&str]) -> Result<String, InjectionError> {
    let output = Command::new(program)
        .args(args)
        .output()
        .await
        .map_err(|source| InjectionError::Spawn {
            program: program.to_string(),
            source,
        })?;
    if !output.status.success() {
        return Err(InjectionError::Geometry(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Parses `getwindowgeometry --shell` output (`WIDTH=...` / `HEIGHT=...`).
pub(crate) fn parse_window_geometry(raw: &str) -> Result<Dimensions, InjectionError> {
    let field = |name: &str| {
        raw.lines()
            .filter_map(|line| line.trim().split_once('='))
            .find(|(key, _)| *key == name)
            .and_then(|(_, value)| value.trim().parse::<f64>().ok())
    };
    match (field("WIDTH"), field("HEIGHT")) {
        (Some(width), Some(height)) if width > 0.0 && height > 0.0 => {
            Ok(Dimensions::new(width, height))
        }
        _ => Err(InjectionError::Geometry(format!(
            "unexpected window geometry output '{}'",
            raw.trim()
        ))),
    }
}

pub(crate) fn parse_geometry(raw: &str) -> Result<Dimensions, InjectionError> {
    let mut parts = raw.split_whitespace().map(str::parse::<f64>);
    match (parts.next(), parts.next()) {
        (Some(Ok(width)), Some(Ok(height))) if width > 0.0 && height > 0.0 => {
            Ok(Dimensions::new(width, height))
        }
        _ => Err(InjectionError::Geometry(format!(
            "unexpected geometry output '{}'",
            raw.trim()
        ))),
    }
}

/// Keysym name for a character-style key code (e.g. 70 is `F`).
pub(crate) fn keysym(key: KeyCode) -> Result<String, InjectionError> {
    match key.0 {
        8 => return Ok("BackSpace".into()),
        9 => return Ok("Tab".into()),
        13 => return Ok("Return".into()),
        27 => return Ok("Escape".into()),
        32 => return Ok("space".into()),
        _ => {}
    }
    char::from_u32(key.0)
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_string())
        .ok_or(InjectionError::Unsupported(key.0))
}

fn pixel(value: f64) -> String {
    (value.round() as i64).to_string()
}

#[async_trait]
impl InjectionPort for XdotoolPort {
    fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    async fn check_key(&self, key: KeyCode) -> InjectionResult {
        keysym(key).map(|_| ())
    }

    async fn move_to(&self, x: f64, y: f64) -> InjectionResult {
        self.run(InjectionOp::Move, &self.move_args(x, y)).await
    }

    async fn move_relative(&self, dx: f64, dy: f64) -> InjectionResult {
        self.run(
            InjectionOp::MoveRelative,
            &["mousemove_relative".into(), "--".into(), pixel(dx), pixel(dy)],
        )
        .await
    }

    async fn mouse_down(&self, button: ButtonCode) -> InjectionResult {
        self.run(
            InjectionOp::MouseDown,
            &["mousedown".into(), button.to_string()],
        )
        .await
    }

    async fn mouse_up(&self, button: ButtonCode) -> InjectionResult {
        self.run(InjectionOp::MouseUp, &["mouseup".into(), button.to_string()])
            .await
    }

    async fn click(&self, button: ButtonCode) -> InjectionResult {
        self.run(InjectionOp::Click, &["click".into(), button.to_string()])
            .await
    }

    async fn key_down(&self, key: KeyCode) -> InjectionResult {
        self.run(InjectionOp::KeyDown, &["keydown".into(), keysym(key)?])
            .await
    }

    async fn key_up(&self, key: KeyCode) -> InjectionResult {
        self.run(InjectionOp::KeyUp, &["keyup".into(), keysym(key)?])
            .await
    }

    async fn key_press(&self, key: KeyCode) -> InjectionResult {
        self.run(InjectionOp::KeyPress, &["key".into(), keysym(key)?])
            .await
    }
}

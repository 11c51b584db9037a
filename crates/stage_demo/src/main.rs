//! Small interactive scene exercising the stage API.
//!
//! An orange ball follows the cursor while a blinking block bounces around
//! the screen. When they touch, the backdrop flashes and the hit counter
//! goes up. Hold the primary button to hide the ball.
//!
//! Usage: `stage_demo [--config stage.json] [--sound hit.wav]`

use std::path::{Path, PathBuf};

use anyhow::Context;
use image::{Rgba, RgbaImage};
use stage_audio::{AudioDevice, Sound};
use stage_core::load_config_from_path;
use stage_runtime::{
    palette, Costume, MouseButton, Scene, SpriteId, Stage, StageConfig, TextId, TextSpec,
};

const DEFAULT_CONFIG_PATH: &str = "stage.json";
const SCREEN: (u32, u32) = (640, 480);
const BLINK_FRAMES: u64 = 30;

struct Args {
    config: Option<PathBuf>,
    sound: Option<PathBuf>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args {
        config: None,
        sound: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => args.config = Some(iter.next().context("--config needs a path")?.into()),
            "--sound" => args.sound = Some(iter.next().context("--sound needs a path")?.into()),
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }
    Ok(args)
}

fn load_config(path: Option<&Path>) -> anyhow::Result<StageConfig> {
    match path {
        Some(path) => Ok(load_config_from_path(path)?),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            Ok(load_config_from_path(Path::new(DEFAULT_CONFIG_PATH))?)
        }
        None => Ok(StageConfig::default()),
    }
}

fn disc(diameter: u32, color: [u8; 4]) -> Costume {
    let r = diameter as f32 / 2.0;
    let image = RgbaImage::from_fn(diameter, diameter, |x, y| {
        let dx = x as f32 + 0.5 - r;
        let dy = y as f32 + 0.5 - r;
        if dx * dx + dy * dy <= r * r {
            Rgba(color)
        } else {
            Rgba([0, 0, 0, 0])
        }
    });
    Costume::from_image(image)
}

fn block(size: u32, color: [u8; 4]) -> Costume {
    Costume::from_image(RgbaImage::from_pixel(size, size, Rgba(color)))
}

struct Demo {
    ball: SpriteId,
    block: SpriteId,
    label: Option<TextId>,
    sound: Option<Sound>,
    velocity: (f32, f32),
    frame: u64,
    hits: u32,
    touching: bool,
}

impl Demo {
    fn step(&mut self, scene: &mut Scene) {
        self.frame += 1;

        let cursor = scene.cursor();
        let (cx, cy, focused) = (cursor.x as f32, cursor.y as f32, cursor.focused);
        let hide_ball = cursor.is_down(MouseButton::Primary);
        if let Ok(ball) = scene.sprite_mut(self.ball) {
            ball.hidden = hide_ball;
            if focused {
                let (w, h) = (ball.width() as f32, ball.height() as f32);
                ball.move_to(cx - w / 2.0, cy - h / 2.0);
            }
        }

        if let Ok(block) = scene.sprite_mut(self.block) {
            block.move_to(block.x + self.velocity.0, block.y + self.velocity.1);
            if block.crosses_edge() {
                let bounds = block.bounds();
                if block.x < 0.0 || block.x + block.width() as f32 > bounds.width as f32 {
                    self.velocity.0 = -self.velocity.0;
                }
                if block.y < 0.0 || block.y + block.height() as f32 > bounds.height as f32 {
                    self.velocity.1 = -self.velocity.1;
                }
                let x = block.x.clamp(0.0, bounds.width.saturating_sub(block.width()) as f32);
                let y = block.y.clamp(0.0, bounds.height.saturating_sub(block.height()) as f32);
                block.move_to(x, y);
            }
            if self.frame % BLINK_FRAMES == 0 {
                block.next_costume();
            }
        }

        let touching = scene.touched(self.ball, self.block).unwrap_or(false);
        if touching && !self.touching {
            self.hits += 1;
            log::info!("Hit #{}", self.hits);
            if let Some(sound) = &self.sound {
                sound.play(1);
            }
            if let Some(label) = self.label {
                if let Ok(text) = scene.text_mut(label) {
                    text.content = format!("Hits: {}", self.hits);
                }
                if let Err(err) = scene.update_text(label) {
                    log::warn!("Could not redraw label: {}", err);
                }
            }
        }
        self.touching = touching;

        let color = if touching { palette::DARK_BLUE } else { palette::BLACK };
        scene.backdrop_mut().set_color(color);
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args()?;
    let config = load_config(args.config.as_deref())?;
    let has_window = config.window.is_some();

    let mut stage = Stage::init(config)?;
    if !has_window {
        stage.screen(SCREEN, "Stage Demo", None)?;
    }

    // Kept alive for the whole run; dropping it stops the output stream.
    let (_audio, sound) = match &args.sound {
        Some(path) => {
            let device = AudioDevice::open()?;
            let sound = Sound::load(device.mixer(), path, 0.8)
                .with_context(|| format!("loading {}", path.display()))?;
            (Some(device), Some(sound))
        }
        None => (None, None),
    };

    let scene = stage.scene_mut();
    scene.backdrop_mut().set_color(palette::BLACK);
    let ball = scene.spawn_sprite_from(vec![disc(48, [255, 165, 0, 255])], 0, false)?;
    let block = scene.spawn_sprite_from(
        vec![block(64, [0, 255, 255, 255]), block(64, [255, 0, 255, 255])],
        0,
        false,
    )?;
    if let Ok(block) = scene.sprite_mut(block) {
        block.move_to(20.0, 20.0);
    }

    let label = match scene.spawn_text(TextSpec::new("Hits: 0", 10, 10, 24).color(palette::WHITE)) {
        Ok(id) => Some(id),
        Err(err) => {
            log::warn!("Text disabled: {}", err);
            None
        }
    };

    let mut demo = Demo {
        ball,
        block,
        label,
        sound,
        velocity: (3.0, 2.0),
        frame: 0,
        hits: 0,
        touching: false,
    };
    stage.run(move |scene| demo.step(scene))?;
    Ok(())
}

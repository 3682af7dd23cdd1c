use anyhow::{Context, Result};

use nv2a_render::coords::{FColor, Rect, Vec2};
use nv2a_render::device::{nv097, SoftDevice, VideoMode};
use nv2a_render::format::PixelFormat;
use nv2a_render::logging::{init_logging, LoggingConfig};
use nv2a_render::render::{BlendMode, GeometryInput, Indices};
use nv2a_render::scene::CommandList;
use nv2a_render::texture::{ScaleMode, TextureAccess};
use nv2a_render::{RendererConfig, RendererSlot};

const FRAMES: usize = 8;
const SPRITE: u32 = 32;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RendererConfig::from_env();
    let mode = VideoMode::new(640, 480, 32);
    let device = SoftDevice::new(mode).with_busy_polls(4);

    let slot = RendererSlot::new();
    let mut renderer = slot
        .create(device, config)
        .context("failed to create renderer")?;

    // ── assets ────────────────────────────────────────────────────────────
    let sprite = renderer
        .create_texture(PixelFormat::Argb8888, TextureAccess::Static, SPRITE, SPRITE)
        .context("failed to create sprite texture")?;
    renderer
        .update_texture(sprite, None, &sprite_pixels(), SPRITE as usize * 4)
        .context("failed to upload sprite")?;

    let canvas = renderer
        .create_texture(PixelFormat::Argb8888, TextureAccess::Target, 128, 128)
        .context("failed to create canvas target")?;

    // ── frames ────────────────────────────────────────────────────────────
    let mut list = CommandList::new();
    for frame in 0..FRAMES {
        list.clear();
        let t = frame as f32 / FRAMES as f32;

        renderer.set_render_target(Some(canvas))?;
        list.clear_target(FColor::new(0.1, 0.1, 0.3, 1.0));
        let quad = quad_at(Vec2::new(48.0 * t, 48.0));
        let colors = [FColor::WHITE; 4];
        let indices = [0u16, 1, 2, 2, 1, 3];
        let uv = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
        ];
        let input = GeometryInput::new(&quad, &colors)
            .textured(sprite, &uv)
            .indexed(Indices::U16(&indices))
            .filter(ScaleMode::PixelArt);
        list.draw_geometry(renderer.queue_geometry(&input)?);
        renderer.run_command_queue(&list)?;

        list.clear();
        renderer.set_render_target(None)?;
        list.set_viewport(Rect::new(0, 0, 640, 480))
            .set_clip_rect(Some(Rect::new(16, 16, 608, 448)))
            .clear_target(FColor::new(0.0, 0.0, 0.0, 1.0));

        let canvas_quad = quad_at(Vec2::new(100.0 + 200.0 * t, 100.0)).map(|p| p * 4.0);
        let canvas_uv = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
        ];
        let blit = GeometryInput::new(&canvas_quad, &colors)
            .textured(canvas, &canvas_uv)
            .indexed(Indices::U16(&indices))
            .blend(BlendMode::None);
        list.draw_geometry(renderer.queue_geometry(&blit)?);

        let star: Vec<Vec2> = (0..=5)
            .map(|i| {
                let a = i as f32 * 4.0 * std::f32::consts::PI / 5.0 + t;
                Vec2::new(320.0 + 80.0 * a.cos(), 240.0 + 80.0 * a.sin())
            })
            .collect();
        list.set_draw_color(FColor::new(1.0, 0.8, 0.0, 1.0))
            .draw_lines(renderer.queue_draw_lines(&star, BlendMode::Add)?)
            .draw_points(renderer.queue_draw_points(&star, BlendMode::Add)?)
            .present();

        renderer
            .run_command_queue(&list)
            .with_context(|| format!("frame {frame} failed"))?;
        log::info!("frame {frame}: {} commands, arena at {}", list.len(), renderer.arena().cursor());
    }

    // ── readback ──────────────────────────────────────────────────────────
    let shot = renderer
        .read_pixels(Rect::new(0, 0, 8, 8), PixelFormat::Rgb565)
        .context("failed to read back buffer")?;

    renderer.destroy_texture(canvas)?;
    renderer.destroy_texture(sprite)?;
    let arena = renderer.arena().clone();
    let device = renderer.destroy();
    let stats = device.stats();

    println!();
    println!("  nv2a-demo: {FRAMES} frames on a {}x{} soft device", mode.width, mode.height);
    println!("  ─────────────────────────────────────────────");
    println!("  submissions        {:>8}", stats.submissions);
    println!("  method groups      {:>8}", device.calls().len());
    println!("  draw batches       {:>8}", device.count(nv097::DRAW_ARRAYS));
    println!("  texture binds      {:>8}", device.count(nv097::SET_TEXTURE_OFFSET));
    println!("  scissor updates    {:>8}", device.count(nv097::SET_WINDOW_CLIP_HORIZONTAL));
    println!("  surface clears     {:>8}", stats.surface_clears);
    println!("  vblank waits       {:>8}", stats.vblank_waits);
    println!("  arena              {arena:?}");
    println!("  readback           {}x{} {} ({} bytes)", shot.width, shot.height, shot.format, shot.pixels.len());
    println!("  live blocks        {:>8}", stats.live_blocks);
    println!();

    Ok(())
}

/// Corners of a sprite-sized quad, in the order the index list expects.
fn quad_at(origin: Vec2) -> [Vec2; 4] {
    let s = SPRITE as f32;
    [
        origin,
        origin + Vec2::new(s, 0.0),
        origin + Vec2::new(0.0, s),
        origin + Vec2::new(s, s),
    ]
}

/// A ringed disc with transparent corners.
fn sprite_pixels() -> Vec<u8> {
    let c = SPRITE as f32 / 2.0;
    let mut out = Vec::with_capacity((SPRITE * SPRITE * 4) as usize);
    for y in 0..SPRITE {
        for x in 0..SPRITE {
            let d = ((x as f32 + 0.5 - c).powi(2) + (y as f32 + 0.5 - c).powi(2)).sqrt();
            let argb: u32 = match d {
                d if d < c * 0.5 => 0xFFFF_4040,
                d if d < c * 0.75 => 0xFFFF_FFFF,
                d if d < c => 0xFF40_40FF,
                _ => 0x0000_0000,
            };
            out.extend_from_slice(&argb.to_le_bytes());
        }
    }
    out
}

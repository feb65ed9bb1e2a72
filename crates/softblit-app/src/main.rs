//! softblit demo: composite a small scene and save it as a PNG.
//!
//! Generates a handful of sprite assets on disk, loads them through a
//! texture manifest, composites a scene with the software renderer
//! (spritesheet frames, alpha blending, viewport scaling, render-to-texture)
//! and writes the result to `demo_out/scene.png`.
//!
//! Usage:
//!   cargo run -p softblit-app --bin softblit-demo [out_dir]

use std::fs;
use std::path::Path;

use anyhow::Result;

use softblit_core::{BlendMode, Renderer, TextureManifest};
use softblit_loader::FileDecoder;
use softblit_types::{Color, Framebuffer, FrameSink, Rect};

const SCREEN_W: u32 = 480;
const SCREEN_H: u32 = 272;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let out_dir = std::env::args().nth(1).unwrap_or_else(|| "demo_out".to_string());
    let out_dir = Path::new(&out_dir);
    let asset_dir = out_dir.join("assets");
    fs::create_dir_all(&asset_dir)?;

    write_demo_assets(&asset_dir)?;
    let manifest_path = asset_dir.join("textures.toml");
    fs::write(&manifest_path, demo_manifest(&asset_dir))?;

    let mut frame = Framebuffer::new(SCREEN_W, SCREEN_H);
    frame.clear(Color::rgb(10, 10, 18));
    let mut renderer = Renderer::new(Box::new(frame), Box::new(FileDecoder::new()));

    let manifest = TextureManifest::load(&manifest_path)?;
    let names = manifest.apply(&mut renderer);
    log::info!("Loaded {} textures from manifest", names.len());

    let background = names["background"];
    let sprites = names["sprites"];
    let glow = names["glow"];

    // Background fills the screen; drawn in screen space before the
    // viewport narrows the world window.
    renderer.draw_to_screen(0.0, 0.0, background, BlendMode::Opaque, None);

    // A 240x136 world window on a 480x272 screen: every world unit
    // covers two pixels.
    renderer.set_viewport(Rect::from_size(0, 0, SCREEN_W / 2, SCREEN_H / 2));

    // One row of spritesheet frames marching across the scene.
    for col in 0..4 {
        let x = 20.0 + col as f32 * 40.0;
        renderer.draw_to_screen(x, 40.0, sprites, BlendMode::Transparent, Some((col, 0)));
    }

    // Render-to-texture: stamp two sprite frames onto a scratch texture,
    // then draw the composite once. Only the frames' opaque pixels carry
    // alpha into the badge, so the transparent redraw keeps their shape.
    let badge = renderer.create_blank_texture(64, 64);
    renderer.draw_to_texture(0.0, 0.0, sprites, badge, BlendMode::Transparent, Some((0, 0)));
    renderer.draw_to_texture(8.0, 8.0, sprites, badge, BlendMode::Transparent, Some((2, 0)));
    renderer.draw_to_screen(90.0, 80.0, badge, BlendMode::Transparent, None);

    // Overlapping translucent glows directly on screen.
    renderer.draw_to_screen(150.0, 70.0, glow, BlendMode::Transparent, None);
    renderer.draw_to_screen(160.0, 78.0, glow, BlendMode::Transparent, None);

    let scene_path = out_dir.join("scene.png");
    let frame = renderer.frame();
    save_png(&scene_path, frame.width(), frame.height(), frame.pixels())?;
    log::info!("Saved {}", scene_path.display());

    println!("Scene written to {}", scene_path.display());
    Ok(())
}

/// Manifest text for the generated assets.
fn demo_manifest(asset_dir: &Path) -> String {
    let dir = asset_dir.display();
    format!(
        r#"[textures.background]
path = "{dir}/background.png"
scale = [{SCREEN_W}, {SCREEN_H}]

[textures.sprites]
path = "{dir}/sprites.png"
columns = 4
rows = 1

[textures.glow]
path = "{dir}/glow.png"
"#
    )
}

/// Generate the demo's source images.
fn write_demo_assets(asset_dir: &Path) -> Result<()> {
    // Checkerboard background, scaled up to screen size by the manifest.
    let (bw, bh) = (160u32, 120u32);
    let mut bg = Vec::with_capacity((bw * bh * 4) as usize);
    for y in 0..bh {
        for x in 0..bw {
            let dark = (x / 8 + y / 8) % 2 == 0;
            if dark {
                bg.extend_from_slice(&[24, 28, 44, 255]);
            } else {
                bg.extend_from_slice(&[36, 42, 64, 255]);
            }
        }
    }
    save_png(&asset_dir.join("background.png"), bw, bh, &bg)?;

    // Four-frame spritesheet of filled discs in different colors, with
    // transparent corners so blending is visible.
    let cell = 16u32;
    let colors: [[u8; 3]; 4] = [
        [230, 80, 80],
        [80, 200, 120],
        [90, 140, 240],
        [240, 200, 90],
    ];
    let mut sheet = vec![0u8; (cell * 4 * cell * 4) as usize];
    for (frame, color) in colors.iter().enumerate() {
        for y in 0..cell {
            for x in 0..cell {
                let dx = x as f32 - 7.5;
                let dy = y as f32 - 7.5;
                if dx * dx + dy * dy <= 7.5 * 7.5 {
                    let px = frame as u32 * cell + x;
                    let i = ((y * cell * 4 + px) * 4) as usize;
                    sheet[i..i + 3].copy_from_slice(color);
                    sheet[i + 3] = 255;
                }
            }
        }
    }
    save_png(&asset_dir.join("sprites.png"), cell * 4, cell, &sheet)?;

    // Radial glow: alpha falls off with distance from the center.
    let gs = 48u32;
    let mut glow = Vec::with_capacity((gs * gs * 4) as usize);
    let half = gs as f32 / 2.0;
    for y in 0..gs {
        for x in 0..gs {
            let dx = x as f32 + 0.5 - half;
            let dy = y as f32 + 0.5 - half;
            let d = (dx * dx + dy * dy).sqrt() / half;
            let a = ((1.0 - d).max(0.0) * 200.0) as u8;
            glow.extend_from_slice(&[200, 220, 255, a]);
        }
    }
    save_png(&asset_dir.join("glow.png"), gs, gs, &glow)?;

    Ok(())
}

/// Save RGBA pixel data as a PNG file.
fn save_png(path: &Path, width: u32, height: u32, rgba: &[u8]) -> Result<()> {
    let file = fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);
    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(rgba)?;
    Ok(())
}

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use image::RgbaImage;
use log::info;
use nalgebra::{point, Point3};

use lucent::camera::Camera;
use lucent::material::Material;
use lucent::object::{Object, Sphere};
use lucent::picture::Color;
use lucent::render::{render_frame, RenderSettings};

fn main() -> Result<()> {
    env_logger::builder().target(env_logger::Target::Stdout).init();

    let ground = Arc::new(Material::lambert(Color::new(0.8, 0.8, 0.0)));
    let center = Arc::new(Material::lambert(Color::new(0.1, 0.2, 0.5)));
    let left = Arc::new(Material::dielectric(1.5));
    let right = Arc::new(Material::metal(Color::new(0.8, 0.6, 0.2), 0.1));

    let world = Object::List(vec![
        Object::Sphere(Sphere::new(point![0.0, -100.5, -1.0], 100.0, ground)),
        Object::Sphere(Sphere::new(point![0.0, 0.0, -1.0], 0.5, center)),
        Object::Sphere(Sphere::new(point![-1.0, 0.0, -1.0], 0.5, left)),
        Object::Sphere(Sphere::new(point![1.0, 0.0, -1.0], 0.5, right)),
    ]);
    let camera = Camera::new(Point3::origin(), 1.0);

    let settings = RenderSettings::new()
        .image_width(800)
        .image_height(450)
        .samples_per_pixel(100);

    info!(target: "app", "Starting frame render...");
    let start = Instant::now();
    let picture = render_frame(&settings, &camera, &world);
    info!(target: "app", "Finished rendering. Took {:?}", start.elapsed());

    let (width, height) = (picture.width(), picture.height());
    let image = RgbaImage::from_raw(width, height, picture.into_raw())
        .context("framebuffer does not match image dimensions")?;
    image.save("render.png")?;
    info!(target: "app", "Wrote render.png");

    Ok(())
}

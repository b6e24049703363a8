use std::iter::repeat_with;

use fastrand::Rng;
use log::trace;
use nalgebra::{point, Point2, vector, Vector3};
use rayon::prelude::*;

use crate::camera::{Camera, Viewport};
use crate::object::Object;
use crate::picture::{Color, Picture, RGBA8};
use crate::ray::Ray;

pub fn random_vec(rng: &mut Rng) -> Vector3<f32> {
    vector![
        rng.f32() * 2.0 - 1.0,
        rng.f32() * 2.0 - 1.0,
        rng.f32() * 2.0 - 1.0
    ]
}

pub fn random_vec_in_unit_sphere(rng: &mut Rng) -> Vector3<f32> {
    repeat_with(|| random_vec(rng))
        .find(|vec| vec.magnitude_squared() < 1.0)
        .expect("infinite iterator")
}

pub fn random_unit_vec(rng: &mut Rng) -> Vector3<f32> {
    random_vec_in_unit_sphere(rng).normalize()
}

/// Keeps a scattered ray from re-hitting the surface it just left.
const SHADOW_ACNE_EPSILON: f32 = 0.001;

pub const MAX_BOUNCES: u32 = 50;

pub fn render_ray(ray: &Ray, object: &Object, bounces_left: u32, rng: &mut Rng) -> Color {
    if let Some(hit) = object.hit(ray, SHADOW_ACNE_EPSILON..) {
        // the bounce budget only caps scattering; a ray that escapes to the
        // sky keeps its gradient contribution
        if bounces_left == 0 {
            return Color::zeros();
        }
        return match hit.material.scatter(ray, &hit, rng) {
            Some((attenuation, scattered)) => {
                attenuation.component_mul(&render_ray(&scattered, object, bounces_left - 1, rng))
            }
            None => Color::zeros(),
        };
    }

    let unit_direction = ray.direction.normalize();
    let t = 0.5 * (unit_direction.y + 1.0);
    (1.0 - t) * Color::new(1.0, 1.0, 1.0) + t * Color::new(0.5, 0.7, 1.0)
}

#[derive(Clone, Debug)]
pub struct RenderSettings {
    pub image_width: u32,
    pub image_height: u32,
    pub samples_per_pixel: u32,
    pub max_bounces: u32,
    pub seed: u64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSettings {
    pub fn new() -> Self {
        Self {
            image_width: 400,
            image_height: 225,
            samples_per_pixel: 100,
            max_bounces: MAX_BOUNCES,
            seed: 0,
        }
    }

    pub fn image_width(mut self, image_width: u32) -> Self {
        self.image_width = image_width;
        self
    }

    pub fn image_height(mut self, image_height: u32) -> Self {
        self.image_height = image_height;
        self
    }

    pub fn samples_per_pixel(mut self, samples: u32) -> Self {
        self.samples_per_pixel = samples;
        self
    }

    pub fn max_bounces(mut self, bounces: u32) -> Self {
        self.max_bounces = bounces;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Produces the color of a single pixel using n randomly jittered samples,
/// averaged and gamma corrected.
pub fn render_pixel(
    p: Point2<u32>,
    viewport: &Viewport,
    object: &Object,
    settings: &RenderSettings,
    rng: &mut Rng,
) -> Color {
    // the - 1.0 spans the pixel centers; a 1-pixel axis would divide by zero
    let u_span = (viewport.image_width - 1.0).max(1.0);
    let v_span = (viewport.image_height - 1.0).max(1.0);
    let sum = (0..settings.samples_per_pixel)
        .map(|_| {
            let u = (p.x as f32 + rng.f32()) / u_span;
            let v = (p.y as f32 + rng.f32()) / v_span;
            render_ray(&viewport.emit_ray(&point![u, v]), object, settings.max_bounces, rng)
        })
        .fold(Color::zeros(), |acc, sample| acc + sample);
    let samples = settings.samples_per_pixel as f32;
    Color::new(
        (sum.x / samples).sqrt(),
        (sum.y / samples).sqrt(),
        (sum.z / samples).sqrt(),
    )
}

/// Renders a full frame, rows in parallel. Every pixel draws from its own
/// RNG seeded from `settings.seed` and the pixel coordinates, so renders are
/// reproducible regardless of how rayon schedules the rows.
pub fn render_frame(settings: &RenderSettings, camera: &Camera, object: &Object) -> Picture {
    let (width, height) = (settings.image_width, settings.image_height);
    let viewport = camera.viewport(width, height);

    let rows: Vec<Vec<RGBA8>> = (0..height)
        .into_par_iter()
        .map(|row| {
            trace!(target: "app", "Rendering row: {row}");
            // viewport v runs bottom-up, image rows top-down
            let y = height - 1 - row;
            (0..width)
                .map(|x| {
                    let mut rng = pixel_rng(settings.seed, x, y);
                    render_pixel(point![x, y], &viewport, object, settings, &mut rng).into()
                })
                .collect()
        })
        .collect();

    Picture::new(rows.into_iter().flatten().collect(), (width, height))
}

fn pixel_rng(seed: u64, x: u32, y: u32) -> Rng {
    Rng::with_seed(seed ^ (((y as u64) << 32) | x as u64))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use nalgebra::{point, Point3};

    use crate::material::Material;
    use crate::object::Sphere;

    use super::*;

    fn sky_color(direction: Vector3<f32>) -> Color {
        let unit_direction = direction.normalize();
        let t = 0.5 * (unit_direction.y + 1.0);
        (1.0 - t) * Color::new(1.0, 1.0, 1.0) + t * Color::new(0.5, 0.7, 1.0)
    }

    #[test]
    fn empty_scene_returns_the_background_gradient() {
        let world = Object::List(vec![]);
        let mut rng = Rng::with_seed(0);

        for direction in [
            vector![0.0, 1.0, 0.0],
            vector![0.0, -1.0, 0.0],
            vector![0.3, 0.2, -1.0],
        ] {
            let ray = Ray::new(Point3::origin(), direction);
            let color = render_ray(&ray, &world, MAX_BOUNCES, &mut rng);
            assert_eq!(color, sky_color(direction));
        }
    }

    #[test]
    fn facing_mirrors_terminate_at_the_bounce_cap_with_black() {
        let mirror = Arc::new(Material::metal(Color::new(1.0, 1.0, 1.0), 0.0));
        let world = Object::List(vec![
            Object::Sphere(Sphere::new(point![0.0, 0.0, -1.0], 0.5, mirror.clone())),
            Object::Sphere(Sphere::new(point![0.0, 0.0, 1.0], 0.5, mirror)),
        ]);

        let ray = Ray::new(Point3::origin(), vector![0.0, 0.0, -1.0]);
        let mut rng = Rng::with_seed(0);
        let color = render_ray(&ray, &world, MAX_BOUNCES, &mut rng);
        assert_eq!(color, Color::zeros());
    }

    #[test]
    fn miss_with_a_spent_bounce_budget_still_returns_the_gradient() {
        let world = Object::List(vec![]);
        let direction = vector![0.0, 1.0, 0.0];
        let ray = Ray::new(Point3::origin(), direction);

        let mut rng = Rng::with_seed(0);
        let color = render_ray(&ray, &world, 0, &mut rng);
        assert_eq!(color, sky_color(direction));
    }

    #[test]
    fn hit_with_a_spent_bounce_budget_returns_black() {
        let matte = Arc::new(Material::lambert(Color::new(0.4, 0.5, 0.6)));
        let world = Object::List(vec![Object::Sphere(Sphere::new(
            point![0.0, 0.0, -1.0],
            0.5,
            matte,
        ))]);
        let ray = Ray::new(Point3::origin(), vector![0.0, 0.0, -1.0]);

        let mut rng = Rng::with_seed(0);
        let color = render_ray(&ray, &world, 0, &mut rng);
        assert_eq!(color, Color::zeros());
    }

    #[test]
    fn single_pixel_frames_render_finite_colors() {
        let world = Object::List(vec![]);
        let camera = Camera::new(Point3::origin(), 1.0);
        let settings = RenderSettings::new()
            .image_width(1)
            .image_height(1)
            .samples_per_pixel(4);
        let viewport = camera.viewport(1, 1);

        let mut rng = Rng::with_seed(5);
        let color = render_pixel(point![0, 0], &viewport, &world, &settings, &mut rng);
        assert!(color.x.is_finite() && color.y.is_finite() && color.z.is_finite());
    }

    #[test]
    fn sampled_unit_vectors_have_unit_length() {
        let mut rng = Rng::with_seed(9);
        for _ in 0..100 {
            let length = random_unit_vec(&mut rng).magnitude();
            assert!((length - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn seeded_renders_are_reproducible() {
        let matte = Arc::new(Material::lambert(Color::new(0.4, 0.5, 0.6)));
        let world = Object::List(vec![Object::Sphere(Sphere::new(
            point![0.0, 0.0, -1.0],
            0.5,
            matte,
        ))]);
        let camera = Camera::new(Point3::origin(), 1.0);
        let settings = RenderSettings::new()
            .image_width(8)
            .image_height(4)
            .samples_per_pixel(4)
            .seed(0xC0FFEE);

        let first = render_frame(&settings, &camera, &world);
        let second = render_frame(&settings, &camera, &world);
        assert_eq!(first.into_raw(), second.into_raw());
    }

    #[test]
    fn pixel_colors_are_gamma_corrected_averages() {
        // straight up: every jittered sample still sees only sky
        let world = Object::List(vec![]);
        let camera = Camera::new(Point3::origin(), 1.0);
        let settings = RenderSettings::new()
            .image_width(100)
            .image_height(100)
            .samples_per_pixel(1);
        let viewport = camera.viewport(100, 100);

        let mut rng = Rng::with_seed(3);
        let mut check = Rng::with_seed(3);
        let color = render_pixel(point![50, 99], &viewport, &world, &settings, &mut rng);

        let u = (50.0 + check.f32()) / 99.0;
        let v = (99.0 + check.f32()) / 99.0;
        let expected = sky_color(viewport.emit_ray(&point![u, v]).direction);
        assert!((color.x - expected.x.sqrt()).abs() < 1e-6);
        assert!((color.y - expected.y.sqrt()).abs() < 1e-6);
        assert!((color.z - expected.z.sqrt()).abs() < 1e-6);
    }
}

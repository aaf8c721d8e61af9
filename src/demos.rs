// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Built-in demo scenes
//!
//! Each demo builds its initial mobjects and a script of waits and
//! animations. [`DemoScene::run`] drives the script through a
//! [`VtkRenderer`], which decides what gets written.

use crate::error::ExportError;
use crate::geometry::{flatten_all, Mesh};
use crate::render::{Animation, VtkRenderer};
use crate::scene::shapes::{
    arrow_tip, circle, cube, cylinder, dot, line, regular_polygon, sphere, square, torus,
    triangle, Axes, CIRCLE_SEGMENTS,
};
use crate::scene::{
    ColorScale, Mobject, Scene, Style, SubPath, Surface, BLUE, GREEN, GREY, ORANGE, PURPLE,
    RED, YELLOW,
};
use anyhow::Result;
use log::info;
use nalgebra::{Point3, Vector3};
use std::f64::consts::TAU;
use std::fmt;
use std::path::PathBuf;

/// One entry of a demo script
#[derive(Debug)]
pub enum Step {
    Wait(f64),
    Play(Animation),
}

/// A named, scripted scene
#[derive(Clone, Copy)]
pub struct DemoScene {
    pub name: &'static str,
    pub description: &'static str,
    build: fn() -> Vec<Mobject>,
    script: fn() -> Vec<Step>,
    /// Point fields attached to the final flattened mesh
    fields: Option<fn(&mut Mesh) -> Result<(), ExportError>>,
}

impl DemoScene {
    /// Scene holding the initial mobjects
    pub fn scene(&self) -> Scene {
        Scene {
            name: self.name.to_string(),
            mobjects: (self.build)(),
        }
    }

    pub fn steps(&self) -> Vec<Step> {
        (self.script)()
    }

    /// Play the script and finish the scene. `on_step` is called after each
    /// step with `(done, total)`.
    pub fn run<F>(&self, renderer: &mut VtkRenderer, mut on_step: F) -> Result<Vec<PathBuf>>
    where
        F: FnMut(usize, usize),
    {
        let mut scene = self.scene();
        renderer.init_scene(&scene)?;

        let steps = self.steps();
        let total = steps.len();
        for (i, step) in steps.iter().enumerate() {
            match step {
                Step::Wait(duration) => renderer.wait(&scene, *duration)?,
                Step::Play(animation) => renderer.play(&mut scene, animation)?,
            }
            on_step(i + 1, total);
        }

        let mut written = renderer.scene_finished(&scene)?;

        if let (Some(attach), Some(exporter)) = (self.fields, renderer.exporter()) {
            let mut mesh = flatten_all(&scene.mobjects);
            attach(&mut mesh)?;
            let name = format!("{}_fields", self.name);
            written.push(exporter.export_mesh(&mesh, &name)?);
        }

        info!("Demo '{}' wrote {} files", self.name, written.len());
        Ok(written)
    }
}

impl fmt::Debug for DemoScene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DemoScene")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("fields", &self.fields.is_some())
            .finish()
    }
}

/// Every built-in demo, in display order
pub fn all() -> Vec<DemoScene> {
    vec![
        DemoScene {
            name: "Circle2DExample",
            description: "A single filled circle",
            build: || vec![circle(2.0).with_color(BLUE).with_fill_opacity(0.5)],
            script: still,
            fields: None,
        },
        DemoScene {
            name: "Square2DExample",
            description: "A filled square",
            build: || vec![square(3.0).with_color(RED).with_fill_opacity(0.7)],
            script: still,
            fields: None,
        },
        DemoScene {
            name: "MultipleShapes2D",
            description: "Three shapes exported as a MultiBlock file",
            build: || {
                vec![
                    circle(1.0).with_color(BLUE).shifted(-Vector3::x() * 2.0),
                    square(2.0).with_color(RED).shifted(Vector3::x() * 2.0),
                    triangle().with_color(GREEN).shifted(Vector3::y() * 2.0),
                ]
            },
            script: still,
            fields: None,
        },
        DemoScene {
            name: "PolygonExample",
            description: "Filled hexagon and pentagon",
            build: || {
                let mut hexagon = regular_polygon(6).with_fill(PURPLE, 0.6);
                hexagon.scale(2.0);
                let mut pentagon = regular_polygon(5).with_fill(ORANGE, 0.6);
                pentagon.scale(1.5).shift(-Vector3::y());
                vec![hexagon, pentagon]
            },
            script: still,
            fields: None,
        },
        DemoScene {
            name: "Sphere3DExample",
            description: "Tessellated sphere",
            build: || vec![sphere(2.0, (32, 32)).with_color(BLUE)],
            script: still,
            fields: None,
        },
        DemoScene {
            name: "Cube3DExample",
            description: "Cube made of six filled faces",
            build: || vec![cube(2.0).with_fill(RED, 0.8)],
            script: still,
            fields: None,
        },
        DemoScene {
            name: "ParametricSurfaceExample",
            description: "z = sin(u) cos(v)",
            build: || {
                vec![parametric(
                    |u, v| u.sin() * v.cos(),
                    (-3.0, 3.0),
                    32,
                    BLUE,
                )]
            },
            script: still,
            fields: None,
        },
        DemoScene {
            name: "SaddleSurface",
            description: "Hyperbolic paraboloid z = u^2 - v^2",
            build: || vec![parametric(|u, v| u * u - v * v, (-2.0, 2.0), 24, YELLOW)],
            script: still,
            fields: None,
        },
        DemoScene {
            name: "TorusSurface",
            description: "Torus with major radius 2 and minor radius 0.5",
            build: || vec![torus(2.0, 0.5).with_color(ORANGE)],
            script: still,
            fields: None,
        },
        DemoScene {
            name: "AnimatedCircle",
            description: "Circle that moves, grows and changes color",
            build: || vec![circle(1.0).with_color(BLUE).with_fill_opacity(0.5)],
            script: || {
                vec![
                    Step::Play(Animation::new(1.0, |mobjects, alpha| {
                        for m in mobjects.iter_mut() {
                            m.shift(Vector3::x() * 2.0 * alpha);
                        }
                    })),
                    Step::Play(Animation::new(1.0, |mobjects, alpha| {
                        for m in mobjects.iter_mut() {
                            m.scale(1.0 + alpha);
                        }
                    })),
                    Step::Play(Animation::new(1.0, |mobjects, alpha| {
                        let color = BLUE.lerp(&RED, alpha as f32);
                        for m in mobjects.iter_mut() {
                            m.set_color(color);
                        }
                    })),
                    Step::Wait(1.0),
                ]
            },
            fields: None,
        },
        DemoScene {
            name: "Rotating3DObject",
            description: "Cube making a full turn about the vertical axis",
            build: || vec![cube(2.0).with_fill(BLUE, 0.8)],
            script: || {
                vec![
                    Step::Play(Animation::new(3.0, |mobjects, alpha| {
                        for m in mobjects.iter_mut() {
                            m.rotate(TAU * alpha, Vector3::y());
                        }
                    })),
                    Step::Wait(1.0),
                ]
            },
            fields: None,
        },
        DemoScene {
            name: "GrowingSurface",
            description: "Low ripple surface scaled up over two seconds",
            build: || {
                vec![parametric(
                    |u, v| 0.1 * u.sin() * v.cos(),
                    (-2.0, 2.0),
                    16,
                    BLUE,
                )]
            },
            script: || {
                vec![
                    Step::Play(Animation::new(2.0, |mobjects, alpha| {
                        for m in mobjects.iter_mut() {
                            m.scale(1.0 + alpha);
                        }
                    })),
                    Step::Wait(1.0),
                ]
            },
            fields: None,
        },
        DemoScene {
            name: "PressureFieldVisualization",
            description: "Surface colored by height with pressure and velocity fields",
            build: || {
                let mut surface = Surface::new(
                    |u, v| Point3::new(u, v, u.sin() * v.cos()),
                    (-3.0, 3.0),
                    (-3.0, 3.0),
                )
                .with_resolution(24, 24);
                surface.color_scale = Some(ColorScale::new(
                    vec![BLUE, GREEN, YELLOW, ORANGE, RED],
                    2,
                ));
                vec![Mobject::surface("Surface", surface)]
            },
            script: || vec![Step::Wait(2.0)],
            fields: Some(pressure_fields),
        },
        DemoScene {
            name: "Axes2DExample",
            description: "Axes with a plotted sine",
            build: || {
                let axes = Axes {
                    x_range: (-3.0, 3.0, 1.0),
                    y_range: (-2.0, 2.0, 1.0),
                    x_length: 8.0,
                    y_length: 5.0,
                    tips: true,
                };
                let graph = axes.plot(f64::sin).with_color(BLUE);
                vec![axes.build(), graph]
            },
            script: still,
            fields: None,
        },
        DemoScene {
            name: "NestedVGroupExample",
            description: "Two nested groups flattened into one block",
            build: || {
                let group1 = Mobject::group(vec![
                    circle(0.5).with_color(BLUE).shifted(-Vector3::x()),
                    square(1.0).with_color(RED).shifted(Vector3::x()),
                ]);
                let group2 = Mobject::group(vec![
                    triangle().with_color(GREEN).shifted(Vector3::y() * 2.0),
                    regular_polygon(5)
                        .with_color(YELLOW)
                        .shifted(-Vector3::y() * 2.0),
                ]);
                vec![Mobject::group(vec![group1, group2])]
            },
            script: still,
            fields: None,
        },
        DemoScene {
            name: "ManyShapes",
            description: "A 10x10 grid of small filled circles",
            build: || {
                let mut shapes = Vec::with_capacity(100);
                for i in 0..10 {
                    for j in 0..10 {
                        let mut c = circle(0.2).with_color(BLUE).with_fill_opacity(0.5);
                        c.move_to(Point3::new(i as f64 - 5.0, j as f64 - 5.0, 0.0));
                        shapes.push(c);
                    }
                }
                vec![Mobject::group(shapes)]
            },
            script: still,
            fields: None,
        },
        DemoScene {
            name: "VGroupExample",
            description: "Row of five circles in one group",
            build: || {
                let circles = (0..5)
                    .map(|i| circle(0.5).with_color(BLUE).shifted(Vector3::x() * (i as f64 - 2.0)))
                    .collect();
                vec![Mobject::group(circles)]
            },
            script: still,
            fields: None,
        },
        DemoScene {
            name: "NumberPlaneExample",
            description: "Coordinate grid with a dot and a circle on it",
            build: || {
                vec![
                    number_plane(),
                    dot(Point3::new(2.0, 1.0, 0.0), 0.08).with_color(RED),
                    circle(0.5)
                        .with_color(BLUE)
                        .shifted(Vector3::new(1.0, 2.0, 0.0)),
                ]
            },
            script: still,
            fields: None,
        },
        DemoScene {
            name: "Multiple3DShapes",
            description: "Sphere, cube and cylinder as separate blocks",
            build: || {
                vec![
                    sphere(1.0, (24, 24))
                        .with_color(BLUE)
                        .shifted(Vector3::new(-2.0, 1.0, 0.0)),
                    cube(1.5).with_fill(RED, 1.0).shifted(Vector3::x() * 2.0),
                    cylinder(0.5, 2.0)
                        .with_fill(GREEN, 1.0)
                        .shifted(-Vector3::y() * 2.0),
                ]
            },
            script: still,
            fields: None,
        },
        DemoScene {
            name: "WaveSurface",
            description: "Radial wave z = sin(sqrt(u^2 + v^2))",
            build: || {
                vec![parametric(
                    |u, v| (u * u + v * v).sqrt().sin(),
                    (-4.0, 4.0),
                    32,
                    BLUE,
                )]
            },
            script: || vec![Step::Wait(2.0)],
            fields: None,
        },
        DemoScene {
            name: "VelocityFieldArrows",
            description: "Grid of arrows following a circular flow",
            build: || vec![velocity_arrows()],
            script: || vec![Step::Wait(2.0)],
            fields: None,
        },
        DemoScene {
            name: "SquareToCircleVTK",
            description: "Square morphing into a circle over two seconds",
            build: || vec![square(2.0).with_color(BLUE).with_fill_opacity(0.5)],
            script: || {
                vec![
                    Step::Play(Animation::new(2.0, square_to_circle)),
                    Step::Wait(1.0),
                ]
            },
            fields: None,
        },
        DemoScene {
            name: "LargeMobject",
            description: "A circle of radius 10",
            build: || vec![circle(10.0).with_color(BLUE).with_fill_opacity(0.5)],
            script: still,
            fields: None,
        },
        DemoScene {
            name: "TinyMobject",
            description: "A dot of radius 0.01",
            build: || vec![dot(Point3::origin(), 0.01)],
            script: still,
            fields: None,
        },
        DemoScene {
            name: "EmptyScene",
            description: "Nothing on stage",
            build: Vec::new,
            script: || vec![Step::Wait(0.1)],
            fields: None,
        },
    ]
}

/// Look up a demo by name, ignoring ASCII case
pub fn find(name: &str) -> Result<DemoScene, ExportError> {
    all()
        .into_iter()
        .find(|demo| demo.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| ExportError::UnknownScene(name.to_string()))
}

fn still() -> Vec<Step> {
    vec![Step::Wait(1.0)]
}

/// Square height-field surface
fn parametric(
    height: fn(f64, f64) -> f64,
    range: (f64, f64),
    resolution: usize,
    color: crate::scene::Rgba,
) -> Mobject {
    let mut surface = Surface::new(move |u, v| Point3::new(u, v, height(u, v)), range, range)
        .with_resolution(resolution, resolution);
    surface.style.fill_color = color;
    surface.style.stroke_color = color;
    surface.style.fill_opacity = 0.8;
    Mobject::surface("Surface", surface)
}

/// Unit grid over x in [-7, 7] and y in [-4, 4]
fn number_plane() -> Mobject {
    let mut lines = Vec::new();
    for x in -7..=7 {
        let x = x as f64;
        lines.push(line(Point3::new(x, -4.0, 0.0), Point3::new(x, 4.0, 0.0)));
    }
    for y in -4..=4 {
        let y = y as f64;
        lines.push(line(Point3::new(-7.0, y, 0.0), Point3::new(7.0, y, 0.0)));
    }
    Mobject::group(lines).with_color(GREY).named("NumberPlane")
}

/// Arrows on a half-unit grid showing the flow (-0.3y, 0.3x)
fn velocity_arrows() -> Mobject {
    let mut arrows = Vec::new();
    for i in 0..9 {
        for j in 0..9 {
            let start = Point3::new(-2.0 + 0.5 * i as f64, -2.0 + 0.5 * j as f64, 0.0);
            let velocity = Vector3::new(-start.y * 0.3, start.x * 0.3, 0.0);
            // No flow at the origin
            if velocity.norm() < 1e-9 {
                continue;
            }
            let end = start + velocity;
            let tip = arrow_tip(end, velocity, 0.1);
            arrows.push(Mobject::group(vec![line(start, end), tip]).named("Arrow"));
        }
    }
    Mobject::group(arrows).with_color(BLUE)
}

/// Blend a square outline into a unit circle, BLUE to RED
fn square_to_circle(mobjects: &mut [Mobject], alpha: f64) {
    let anchors = (0..CIRCLE_SEGMENTS)
        .map(|i| {
            let (sin, cos) = (TAU * i as f64 / CIRCLE_SEGMENTS as f64).sin_cos();
            let on_circle = Vector3::new(cos, sin, 0.0);
            let on_square = on_circle / cos.abs().max(sin.abs());
            Point3::from(on_square.lerp(&on_circle, alpha))
        })
        .collect();
    let color = BLUE.lerp(&RED, alpha as f32);

    if let Some(shape) = mobjects.first_mut() {
        *shape = Mobject::path(
            "Square",
            vec![SubPath::closed(anchors)],
            Style::filled(color, 0.5),
        );
    }
}

/// Height as pressure, circular flow as velocity
fn pressure_fields(mesh: &mut Mesh) -> Result<(), ExportError> {
    let pressure: Vec<f64> = mesh.points.iter().map(|p| p.z).collect();
    let velocity: Vec<[f64; 3]> = mesh
        .points
        .iter()
        .map(|p| [-p.y * 0.3, p.x * 0.3, 0.0])
        .collect();
    let magnitude: Vec<f64> = velocity
        .iter()
        .map(|v| (v[0] * v[0] + v[1] * v[1]).sqrt())
        .collect();

    mesh.attach_scalar("pressure", &pressure)?;
    mesh.attach_scalar("speed", &magnitude)?;
    mesh.attach_vector("velocity", &velocity)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExportConfig;

    #[test]
    fn test_names_are_unique() {
        let demos = all();
        let mut names: Vec<_> = demos.iter().map(|d| d.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), demos.len());
    }

    #[test]
    fn test_find_is_case_insensitive() {
        assert_eq!(find("animatedcircle").map(|d| d.name).ok(), Some("AnimatedCircle"));
        assert!(matches!(
            find("NoSuchScene"),
            Err(ExportError::UnknownScene(name)) if name == "NoSuchScene"
        ));
    }

    #[test]
    fn test_every_demo_builds() {
        for demo in all() {
            let scene = demo.scene();
            let mesh = flatten_all(&scene.mobjects);
            assert!(mesh.indices_in_bounds(), "{} has bad indices", demo.name);
            assert!(!demo.steps().is_empty());
        }
    }

    #[test]
    fn test_square_to_circle_endpoints() {
        let demo = find("SquareToCircleVTK").unwrap();
        let mut start = demo.scene().mobjects;
        square_to_circle(&mut start, 0.0);
        let bbox = start[0].bounding_box();
        assert!((bbox.size().x - 2.0).abs() < 1e-9);

        let mut end = demo.scene().mobjects;
        square_to_circle(&mut end, 1.0);
        let mesh = flatten_all(&end);
        assert!(mesh.points.iter().all(|p| (p.coords.norm() - 1.0).abs() < 1e-9));
        assert_eq!(mesh.point_colors.map(|c| c[0].to_u8()), Some(RED.with_alpha(0.5).to_u8()));
    }

    #[test]
    fn test_velocity_arrows_skip_origin() {
        let arrows = velocity_arrows();
        assert_eq!(arrows.children().len(), 80);
        assert!(arrows.children().iter().all(|a| a.type_name == "Arrow"));
    }

    #[test]
    fn test_pressure_demo_writes_fields() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let mut renderer = VtkRenderer::new(ExportConfig {
            media_dir: dir.path().to_path_buf(),
            vtk_export: true,
            write_viewer: false,
            ..ExportConfig::default()
        });

        let written = find("PressureFieldVisualization")?.run(&mut renderer, |_, _| {})?;
        let fields_file = written
            .iter()
            .find(|p| p.ends_with("PressureFieldVisualization_fields.vtp"))
            .expect("fields file written");
        let summary = crate::io::read_polydata_summary(fields_file)?;
        assert_eq!(summary.points, 24 * 24);
        assert!(summary.point_arrays.contains(&"velocity".to_string()));
        assert!(summary.point_arrays.contains(&"Colors".to_string()));
        Ok(())
    }
}

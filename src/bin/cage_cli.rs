#[cfg(target_arch = "wasm32")]
fn main() {
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(err) = native::run() {
        eprintln!("cage_cli error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use cage_engine::cage::{BoundingCage, CageErrorKind};
    use cage_engine::geom::{GeomMesh, Point2, Point3};
    use std::fs::{self, File};
    use std::io::{BufWriter, Write};
    use std::path::{Path, PathBuf};

    const USAGE: &str = r#"cage_cli (cage-engine)

USAGE:
  cage_cli demo [options]

OPTIONS (demo):
  --points <n>       Skeleton samples along the helix (default 24, min 2)
  --splits <k>       Evenly spaced splits (default 8)
  --smooth <s>       Smoothing passes over the skeleton (default 2)
  --obj <path>       Write the cage mesh as OBJ
  --overwrite        Overwrite an existing OBJ file
  -h, --help         Show this help
"#;

    const HELIX_RADIUS: f64 = 3.0;
    const HELIX_RISE: f64 = 0.8;
    /// Total turn of the helix in radians, kept gentle so splits validate.
    const HELIX_SWEEP: f64 = 1.0;
    const TEMPLATE_HALF_SIZE: f64 = 0.25;

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut args = Args::new(args);

        let Some(command) = args.next() else {
            print_usage();
            return Ok(());
        };

        match command.as_str() {
            "demo" => cmd_demo(&mut args),
            "-h" | "--help" | "help" => {
                print_usage();
                Ok(())
            }
            other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
        }
    }

    fn print_usage() {
        println!("{USAGE}");
    }

    fn cmd_demo(args: &mut Args) -> Result<(), String> {
        let mut points = 24usize;
        let mut splits = 8usize;
        let mut smooth = 2usize;
        let mut obj_path: Option<PathBuf> = None;
        let mut overwrite = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--points" => points = args.number("--points")?,
                "--splits" => splits = args.number("--splits")?,
                "--smooth" => smooth = args.number("--smooth")?,
                "--obj" => obj_path = Some(PathBuf::from(args.value("--obj")?)),
                "--overwrite" => overwrite = true,
                "-h" | "--help" => {
                    print_usage();
                    return Ok(());
                }
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }

        let mut cage = BoundingCage::new();
        cage.set_skeleton_vertices(&helix(points), smooth, &square_template())
            .map_err(|e| format!("set skeleton: {e}"))?;

        let max = cage.max_index();
        let mut rejected = 0usize;
        for j in 1..=splits {
            let index = max * j as f64 / (splits + 1) as f64;
            match cage.split(index) {
                Ok(_) => {}
                Err(err) if err.kind() == CageErrorKind::InvalidArgument => {
                    return Err(format!("split at {index}: {err}"));
                }
                Err(err) => {
                    eprintln!("split at {index:.3} rejected: {err}");
                    rejected += 1;
                }
            }
        }

        cage.check_invariants()
            .map_err(|e| format!("cage invariants: {e}"))?;
        let mesh = cage.mesh();

        println!(
            "cage: range=[{}, {}] cells={} keyframes={} rejected_splits={rejected}",
            cage.min_index(),
            cage.max_index(),
            cage.cell_count(),
            cage.keyframe_count()
        );
        println!(
            "mesh: vertices={} triangles={} closed={} volume={:.6}",
            mesh.vertex_count(),
            mesh.triangle_count(),
            mesh.is_closed(),
            mesh.signed_volume()
        );

        if let Some(path) = obj_path.as_deref() {
            write_obj_file(path, &mesh, "cage", overwrite)?;
            eprintln!("wrote {}", path.display());
        }
        Ok(())
    }

    fn helix(count: usize) -> Vec<Point3> {
        let steps = count.saturating_sub(1).max(1) as f64;
        (0..count)
            .map(|i| {
                let t = i as f64 / steps;
                let angle = t * HELIX_SWEEP;
                Point3::new(
                    HELIX_RADIUS * angle.cos(),
                    HELIX_RADIUS * angle.sin(),
                    HELIX_RISE * t,
                )
            })
            .collect()
    }

    fn square_template() -> Vec<Point2> {
        let h = TEMPLATE_HALF_SIZE;
        vec![
            Point2::new(-h, -h),
            Point2::new(h, -h),
            Point2::new(h, h),
            Point2::new(-h, h),
        ]
    }

    fn write_obj_file(path: &Path, mesh: &GeomMesh, name: &str, overwrite: bool) -> Result<(), String> {
        mesh.validate().map_err(|e| format!("mesh validation failed: {e}"))?;

        if path.exists() && !overwrite {
            return Err(format!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| format!("create dir {}: {e}", parent.display()))?;
        }

        let file = File::create(path).map_err(|e| format!("create {}: {e}", path.display()))?;
        let mut w = BufWriter::new(file);

        writeln!(w, "# cage-engine cage_cli").map_err(|e| format!("write obj: {e}"))?;
        writeln!(w, "o {name}").map_err(|e| format!("write obj: {e}"))?;

        for p in mesh.positions.iter().copied() {
            writeln!(w, "v {} {} {}", p[0], p[1], p[2]).map_err(|e| format!("write obj: {e}"))?;
        }
        for tri in mesh.indices.chunks_exact(3) {
            writeln!(w, "f {} {} {}", tri[0] + 1, tri[1] + 1, tri[2] + 1)
                .map_err(|e| format!("write obj: {e}"))?;
        }

        w.flush().map_err(|e| format!("flush obj: {e}"))
    }

    struct Args {
        args: Vec<String>,
        pos: usize,
    }

    impl Args {
        fn new(args: Vec<String>) -> Self {
            Self { args, pos: 0 }
        }

        fn next(&mut self) -> Option<String> {
            let arg = self.args.get(self.pos)?.clone();
            self.pos += 1;
            Some(arg)
        }

        fn value(&mut self, flag: &str) -> Result<String, String> {
            self.next()
                .ok_or_else(|| format!("missing value for {flag}"))
        }

        fn number(&mut self, flag: &str) -> Result<usize, String> {
            let raw = self.value(flag)?;
            raw.parse()
                .map_err(|e| format!("invalid value `{raw}` for {flag}: {e}"))
        }
    }
}

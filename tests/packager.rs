use std::fs;
use std::path::PathBuf;

use npm_packager::{Packager, PackagerConfig, PackagerError, ParameterSet};
use tempfile::{TempDir, tempdir};

struct Workspace {
  temp: TempDir,
}

impl Workspace {
  fn new() -> Self {
    Self {
      temp: tempdir().expect("failed to create temp dir"),
    }
  }

  fn path(&self, relative: &str) -> PathBuf {
    self.temp.path().join(relative)
  }

  fn write(&self, relative: &str, content: &str) -> PathBuf {
    let path = self.path(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
  }

  fn read(&self, relative: &str) -> String {
    fs::read_to_string(self.path(relative))
      .unwrap_or_else(|err| panic!("failed to read {relative}: {err}"))
  }

  fn params(&self) -> ParameterSet {
    ParameterSet {
      out_dir: self.path("out"),
      base_dir: PathBuf::from("pkg"),
      srcs: Vec::new(),
      bin_dir: self.path("bazel-bin"),
      gen_dir: self.path("bazel-genfiles"),
      deps: Vec::new(),
      packages: Vec::new(),
      replacements_json: "{}".into(),
      pack_path: self.path("npm_package.pack.sh"),
      publish_path: self.path("npm_package.publish.sh"),
      stamp_file: None,
    }
  }

  fn template_config(&self) -> PackagerConfig {
    let template = self.write("run_npm.sh.template", "npm TMPL_args");
    PackagerConfig::default().with_template_path(template)
  }
}

fn joined(paths: &[PathBuf]) -> String {
  paths
    .iter()
    .map(|path| path.display().to_string())
    .collect::<Vec<_>>()
    .join(",")
}

#[test]
fn sources_land_relative_to_base_dir() {
  let ws = Workspace::new();
  let src = ws.write("a/x.txt", "name: REPLACE_ME\n");
  let params = ParameterSet {
    base_dir: ws.path("a"),
    srcs: vec![src],
    replacements_json: r#"{"REPLACE_ME": "replaced"}"#.into(),
    ..ws.params()
  };

  let report = Packager::new(params, ws.template_config()).run().unwrap();

  assert_eq!(report.sources, 1);
  assert_eq!(ws.read("out/x.txt"), "name: replaced\n");
}

#[test]
fn dependencies_come_from_binaries_or_generated_root() {
  let ws = Workspace::new();
  let bin_dep = ws.write("bazel-bin/pkg/lib/index.js", "// BEGIN-INTERNAL\nsecret\n// END-INTERNAL\nexport {};\n");
  let gen_dep = ws.write("bazel-genfiles/pkg/types.d.ts", "export type T = 1;\n");
  let params = ParameterSet {
    deps: vec![bin_dep, gen_dep],
    ..ws.params()
  };

  let report = Packager::new(params, ws.template_config()).run().unwrap();

  assert_eq!(report.dependencies, 2);
  assert_eq!(ws.read("out/lib/index.js"), "\nexport {};\n");
  assert_eq!(ws.read("out/types.d.ts"), "export type T = 1;\n");
}

#[test]
fn dependency_outside_roots_fails_the_run() {
  let ws = Workspace::new();
  let stray = ws.write("elsewhere/pkg/f.js", "x");
  let params = ParameterSet {
    deps: vec![stray.clone()],
    ..ws.params()
  };

  let err = Packager::new(params, ws.template_config()).run().unwrap_err();

  match err.downcast_ref::<PackagerError>() {
    Some(PackagerError::PathResolution { path }) => assert_eq!(path, &stray),
    other => panic!("unexpected error: {other:?}"),
  }
  assert!(!ws.path("npm_package.pack.sh").exists());
}

#[test]
fn packages_copy_nested_contents_under_their_name() {
  let ws = Workspace::new();
  ws.write("bazel-bin/pkg/sub/f1", "one 0.0.0-PLACEHOLDER");
  ws.write("bazel-bin/pkg/sub/dir/f2", "two 0.0.0-PLACEHOLDER");
  let stamp = ws.write("volatile-status.txt", "BUILD_TIMESTAMP 1\nBUILD_SCM_VERSION 1.2.3\n");
  let params = ParameterSet {
    packages: vec![ws.path("bazel-bin/pkg/sub")],
    stamp_file: Some(stamp),
    ..ws.params()
  };

  let report = Packager::new(params, ws.template_config()).run().unwrap();

  assert_eq!(report.package_files, 2);
  assert_eq!(ws.read("out/sub/f1"), "one 1.2.3");
  assert_eq!(ws.read("out/sub/dir/f2"), "two 1.2.3");
}

#[test]
fn launchers_run_npm_against_out_dir() {
  let ws = Workspace::new();
  let params = ws.params();
  let out_dir = params.out_dir.display().to_string();

  let report = Packager::new(params, ws.template_config()).run().unwrap();

  assert_eq!(report.launchers.pack, ws.path("npm_package.pack.sh"));
  assert_eq!(ws.read("npm_package.pack.sh"), format!("npm pack {out_dir}"));
  assert_eq!(ws.read("npm_package.publish.sh"), format!("npm publish {out_dir}"));
}

#[test]
fn launchers_are_not_transformed() {
  let ws = Workspace::new();
  let template = ws.write("t.template", "npm TMPL_args # 0.0.0-PLACEHOLDER");
  let stamp = ws.write("stamp.txt", "BUILD_SCM_VERSION 9.9.9\n");
  let params = ParameterSet {
    stamp_file: Some(stamp),
    ..ws.params()
  };

  Packager::new(params, PackagerConfig::default().with_template_path(template))
    .run()
    .unwrap();

  assert!(ws.read("npm_package.pack.sh").ends_with("# 0.0.0-PLACEHOLDER"));
}

#[test]
fn runs_from_a_quoted_parameter_file() {
  let ws = Workspace::new();
  let srcs = vec![
    ws.write("pkg/package.json", r#"{"name": "@scope/pkg", "version": "0.0.0-PLACEHOLDER"}"#),
    ws.write("pkg/README.md", "# pkg\n"),
  ];
  let deps = vec![ws.write("bazel-bin/pkg/index.js", "module.exports = require('./impl');\n")];
  ws.write("bazel-genfiles/pkg/esm/index.mjs", "export * from './impl.mjs';\n");
  let stamp = ws.write("stamp.txt", "BUILD_SCM_VERSION 2.0.0\n");

  let lines = [
    ws.path("out").display().to_string(),
    ws.path("pkg").display().to_string(),
    joined(&srcs),
    ws.path("bazel-bin").display().to_string(),
    ws.path("bazel-genfiles").display().to_string(),
    format!("{},", joined(&deps)),
    ws.path("bazel-genfiles/pkg/esm").display().to_string(),
    r#"{"\\./impl": "./lib/impl"}"#.to_string(),
    ws.path("pack.sh").display().to_string(),
    ws.path("publish.sh").display().to_string(),
    stamp.display().to_string(),
  ];
  let params_file = ws.write(
    "params.txt",
    &format!(
      "{}\n",
      lines
        .iter()
        .map(|line| format!("'{line}'"))
        .collect::<Vec<_>>()
        .join("\n")
    ),
  );

  let packager = Packager::from_parameter_file(&params_file, ws.template_config()).unwrap();
  let report = packager.run().unwrap();

  assert_eq!((report.sources, report.dependencies, report.package_files), (2, 1, 1));
  assert_eq!(
    ws.read("out/package.json"),
    r#"{"name": "@scope/pkg", "version": "2.0.0"}"#
  );
  assert_eq!(ws.read("out/README.md"), "# pkg\n");
  assert_eq!(ws.read("out/index.js"), "module.exports = require('./lib/impl');\n");
  assert_eq!(ws.read("out/esm/index.mjs"), "export * from './lib/impl.mjs';\n");
  assert!(ws.read("pack.sh").starts_with("npm pack "));
}

#[test]
fn malformed_replacements_are_reported() {
  let ws = Workspace::new();
  let params = ParameterSet {
    replacements_json: "[1, 2]".into(),
    ..ws.params()
  };

  let err = Packager::new(params, ws.template_config()).run().unwrap_err();
  assert!(matches!(
    err.downcast_ref::<PackagerError>(),
    Some(PackagerError::ParameterFormat { .. })
  ));
}

#[test]
fn missing_parameter_file_is_reported() {
  let ws = Workspace::new();
  let missing = ws.path("missing-params.txt");
  let err = match Packager::from_parameter_file(&missing, PackagerConfig::default()) {
    Ok(_) => panic!("expected an error"),
    Err(err) => err,
  };
  assert!(err.to_string().contains(&missing.display().to_string()));
}

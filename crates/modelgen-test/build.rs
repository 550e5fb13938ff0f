use modelgen::{Introspector, ModelGen};
use std::env::var;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

fn introspect(module: &str) -> Result<ModelGen, Box<dyn Error>> {
  let path = format!("src/api/{}.rs", module);
  println!("cargo:rerun-if-changed={}", path);
  let introspector = Introspector::from_file(&format!("crate::api::{}", module), path)?;
  let mut gen = ModelGen::new(introspector);
  gen.target_namespace(&format!("crate::models::{}", module));
  Ok(gen)
}

fn write(out_dir: &Path, module: &str, gen: &ModelGen) -> Result<(), Box<dyn Error>> {
  fs::write(out_dir.join(format!("{}.rs", module)), gen.generate()?)?;
  Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
  println!("cargo:rerun-if-changed=build.rs");
  let out_dir = PathBuf::from(var("OUT_DIR")?);

  let mut basic = introspect("basic")?;
  basic.map("User")?;
  write(&out_dir, "basic", &basic)?;

  let mut custom = introspect("custom")?;
  custom
    .register("Account")?
    .rename("id", "external_id")
    .omit("name")
    .omit("legacy_field")
    .omit("nickname")
    .retype("balance", "crate::units::Cents")
    .retype("deposits", "Vec<crate::units::Cents>")
    .build()?;
  write(&out_dir, "custom", &custom)?;

  let mut nested = introspect("nested")?;
  nested.map("Blog")?;
  write(&out_dir, "nested", &nested)?;

  let mut everything = introspect("everything")?;
  everything.map("Organization")?;
  everything
    .register("Settings")?
    .omit("retries")
    .build()?;
  write(&out_dir, "everything", &everything)?;

  // Each unit on its own, to check that standalone files compile.
  for unit in basic.generate_units() {
    let name = format!("unit_{}.rs", unit.type_name.to_lowercase());
    fs::write(out_dir.join(name), unit.result?)?;
  }

  Ok(())
}

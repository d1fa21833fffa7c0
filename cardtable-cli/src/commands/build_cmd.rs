use crate::project::{self, WEB_CRATE_DIR};

pub async fn run(dev: bool) -> anyhow::Result<()> {
    let root = project::find_workspace_root_from(&std::env::current_dir()?)?;
    let cwd = root.join(WEB_CRATE_DIR);
    let args = wasm_pack_args(dev);

    println!("Building {WEB_CRATE_DIR} in {}...", cwd.display());
    log::debug!("wasm-pack {}", args.join(" "));

    let status = tokio::process::Command::new("wasm-pack")
        .args(&args)
        .current_dir(&cwd)
        .stdin(std::process::Stdio::inherit())
        .stdout(std::process::Stdio::inherit())
        .stderr(std::process::Stdio::inherit())
        .status()
        .await
        .map_err(|e| anyhow::anyhow!("failed to start wasm-pack ({e}); is it installed?"))?;

    std::process::exit(status.code().unwrap_or(1));
}

fn wasm_pack_args(dev: bool) -> Vec<&'static str> {
    let profile = if dev { "--dev" } else { "--release" };
    vec!["build", "--target", "web", profile]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wasm_pack_args() {
        assert_eq!(wasm_pack_args(false), vec!["build", "--target", "web", "--release"]);
        assert_eq!(wasm_pack_args(true).last(), Some(&"--dev"));
    }
}

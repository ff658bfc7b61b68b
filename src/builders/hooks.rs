use anyhow::Result;
use std::fs;
use std::path::Path;

const PRE_COMMIT_HOOK: &str = r#"#!/bin/sh
# Git Hook Manifest - Pre-commit Hook

# Check if git-hook-manifest is available
if ! command -v git-hook-manifest > /dev/null 2>&1; then
    echo "Warning: git-hook-manifest not found in PATH"
    exit 0
fi

# Refuse the commit if the hook manifest no longer loads cleanly
git-hook-manifest validate
if [ $? -ne 0 ]; then
    echo "Error: hook manifest failed validation"
    exit 1
fi
"#;

const PRE_PUSH_HOOK: &str = r#"#!/bin/sh
# Git Hook Manifest - Pre-push Hook

# Check if git-hook-manifest is available
if ! command -v git-hook-manifest > /dev/null 2>&1; then
    echo "Warning: git-hook-manifest not found in PATH"
    exit 0
fi

# Verify the manifest before anything leaves the machine
git-hook-manifest validate
"#;

pub fn install_git_hooks(repo_root: &Path) -> Result<()> {
    let hooks_dir = repo_root.join(".git").join("hooks");
    fs::create_dir_all(&hooks_dir)?;

    install_hook(&hooks_dir, "pre-commit", PRE_COMMIT_HOOK)?;
    install_hook(&hooks_dir, "pre-push", PRE_PUSH_HOOK)?;

    Ok(())
}

fn install_hook(hooks_dir: &Path, hook_name: &str, hook_content: &str) -> Result<()> {
    let hook_path = hooks_dir.join(hook_name);

    if hook_path.exists() {
        // Check if it's already our hook
        let existing_content = fs::read_to_string(&hook_path)?;
        if existing_content.contains("Git Hook Manifest") {
            println!("ℹ️  {hook_name} hook already installed");
            return Ok(());
        }

        // Backup existing hook
        let backup_path = hooks_dir.join(format!("{hook_name}.backup"));
        fs::rename(&hook_path, backup_path)?;
        println!("ℹ️  Backed up existing {hook_name} hook");
    }

    fs::write(&hook_path, hook_content)?;

    // Make executable on Unix systems
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(&hook_path)?.permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&hook_path, perms)?;
    }

    Ok(())
}

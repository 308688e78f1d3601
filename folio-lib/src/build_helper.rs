use crate::{LoadState, Portfolio, ProfileSource};

/// Build script helper for rendering the site at build time.
///
/// This function should be called from your build.rs script. It will:
/// - Tell cargo to rerun the build script when the profile document changes
/// - Load the profile and render `index.html` plus `profile.json` into `output_dir`
/// - Fail the build if the profile cannot be read or parsed
///
/// # Arguments
///
/// * `profile_file` - Path to the JSON profile document (relative to build.rs)
/// * `output_dir` - Directory to write the rendered site into (relative to build.rs, typically "dist")
///
/// # Example
///
/// ```rust,no_run
/// // build.rs
/// use folio::render_at_build_time;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     render_at_build_time("profile.json", "dist").await?;
///
///     Ok(())
/// }
/// ```
pub async fn render_at_build_time(
    profile_file: &str,
    output_dir: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    // Tell cargo to rerun if the profile document changes
    println!("cargo:rerun-if-changed={}", profile_file);

    let portfolio = Portfolio::new(ProfileSource::File(profile_file.into())).await;

    if let LoadState::Failed = portfolio.load_state() {
        return Err(format!("failed to load profile document {}", profile_file).into());
    }

    let index = portfolio.write_site(output_dir).await?;
    println!("cargo:info=Rendered portfolio page at {}", index.display());

    Ok(())
}

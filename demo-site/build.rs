use folio::render_at_build_time;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    render_at_build_time("profile.json", "dist").await?;

    Ok(())
}

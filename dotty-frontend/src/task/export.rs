use std::path::Path;

use dotty_history::Graphviz;
use tokio::fs;

use crate::error::AppError;

pub async fn write_svg(path: &Path, markup: &str) -> Result<(), AppError> {
    tracing::debug!("writing {} bytes of svg to {:?}", markup.len(), path);

    fs::write(path, markup).await?;
    Ok(())
}

/// Renders edited graph source and writes the markup to `path`.
pub async fn render_svg(renderer: &Graphviz, source: &str, path: &Path) -> Result<(), AppError> {
    tracing::debug!("rendering svg to {:?}", path);

    let markup = renderer.render(source).await?;
    write_svg(path, &markup).await
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use dotty_history::RenderError;

    use super::*;

    #[tokio::test]
    async fn write_svg_creates_file() {
        let path = std::env::temp_dir().join(format!("dotty-export-{}.svg", std::process::id()));

        write_svg(&path, "<svg/>").await.unwrap();

        assert_eq!("<svg/>", std::fs::read_to_string(&path).unwrap());
        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn render_svg_missing_program_fails() {
        let path = std::env::temp_dir().join("dotty-never-written.svg");
        let renderer = Graphviz::new(PathBuf::from("/nonexistent/dotty/renderer"));

        let result = render_svg(&renderer, "digraph { a }", &path).await;

        assert!(matches!(
            result,
            Err(AppError::RenderFailed(RenderError::Unavailable(_)))
        ));
        assert!(!path.exists());
    }
}

use askama::Template;

use crate::submission::pipeline::PipelineResult;

#[derive(Template)]
#[template(path = "registro/completado.html")]
struct CompletedTemplate<'a> {
    folder: &'a str,
    files: Vec<&'a str>,
}

pub fn render_completed(result: &PipelineResult) -> String {
    let template = CompletedTemplate {
        folder: &result.folder,
        files: result.files.iter().map(|f| f.name.as_str()).collect(),
    };
    template.render().unwrap_or_default()
}

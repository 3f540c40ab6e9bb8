use gloo_file::{File as GlooFile, ObjectUrl};
use gloo_net::http::Request;
use shared::PredictionResponse;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

enum Msg {
    FileSelected(GlooFile),
    Analyze,
    PredictionResult(PredictionResponse),
    SetError(Option<String>),
}

struct Model {
    file: Option<GlooFile>,
    preview_url: Option<ObjectUrl>,
    result: Option<PredictionResponse>,
    loading: bool,
    error: Option<String>,
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            file: None,
            preview_url: None,
            result: None,
            loading: false,
            error: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::FileSelected(file) => {
                gloo_console::log!("Selected file:", file.name());
                self.preview_url = Some(ObjectUrl::from(file.clone()));
                self.file = Some(file);
                self.result = None;
                self.error = None;
                true
            }
            Msg::Analyze => self.handle_analyze(ctx),
            Msg::PredictionResult(response) => {
                self.result = Some(response);
                self.loading = false;
                true
            }
            Msg::SetError(error) => {
                self.error = error;
                self.loading = false;
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="container">
                { self.render_header() }

                <main class="main-content">
                    { self.render_upload_section(ctx) }
                    { self.render_error_message() }
                    { self.render_results() }
                </main>

                <footer class="app-footer">
                    <p>{"Eye Fundus Diagnosis | Fullstack Rust WASM"}</p>
                </footer>
            </div>
        }
    }
}

impl Model {
    fn handle_analyze(&mut self, ctx: &Context<Self>) -> bool {
        let Some(file) = self.file.clone() else {
            ctx.link()
                .send_message(Msg::SetError(Some("No file selected for analysis.".into())));
            return false;
        };

        self.loading = true;
        self.error = None;
        self.send_analysis_request(ctx, file);
        true
    }

    fn send_analysis_request(&self, ctx: &Context<Self>, file: GlooFile) {
        spawn_local({
            let link = ctx.link().clone();

            async move {
                let form_data = web_sys::FormData::new().unwrap();
                form_data.append_with_blob("file", file.as_ref()).unwrap();

                let request = Request::post("/api/predict")
                    .body(form_data)
                    .expect("Failed to build request.");

                match request.send().await {
                    Ok(response) => {
                        if response.ok() {
                            match response.json::<PredictionResponse>().await {
                                Ok(result) => link.send_message(Msg::PredictionResult(result)),
                                Err(e) => link.send_message(Msg::SetError(Some(format!(
                                    "Failed to parse response: {}",
                                    e
                                )))),
                            }
                        } else {
                            let status = response.status();
                            let body = response.text().await.unwrap_or_default();
                            link.send_message(Msg::SetError(Some(format!(
                                "Server error: {} - {}",
                                status, body
                            ))))
                        }
                    }
                    Err(e) => {
                        link.send_message(Msg::SetError(Some(format!("Network error: {}", e))))
                    }
                }
            }
        });
    }
}

impl Model {
    fn render_header(&self) -> Html {
        html! {
            <header class="app-header">
                <h1><i class="fa-solid fa-eye"></i> {" Eye Fundus Diagnosis"}</h1>
                <p class="subtitle">{"Upload a fundus photograph to screen for common eye diseases"}</p>
            </header>
        }
    }

    fn render_upload_section(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let handle_change = link.batch_callback(|e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let file = input
                .files()
                .and_then(|files| files.item(0))
                .map(GlooFile::from);
            input.set_value("");
            file.map(Msg::FileSelected)
        });

        let trigger_file_input = Callback::from(|_: MouseEvent| {
            if let Some(input) = web_sys::window()
                .unwrap()
                .document()
                .unwrap()
                .get_element_by_id("file-input")
            {
                if let Ok(html_input) = input.dyn_into::<web_sys::HtmlElement>() {
                    html_input.click();
                }
            }
        });

        html! {
            <div class="upload-section">
                <input
                    type="file"
                    id="file-input"
                    accept=".jpg,.jpeg,.png"
                    style="display: none;"
                    onchange={handle_change}
                />

                <button id="upload-button" class="analyze-btn" onclick={trigger_file_input}>
                    <i class="fa-solid fa-upload"></i> {" Select Image"}
                </button>

                { self.render_preview(ctx) }
            </div>
        }
    }

    fn render_preview(&self, ctx: &Context<Self>) -> Html {
        let Some(url) = &self.preview_url else {
            return html! {
                <div class="upload-placeholder">
                    <p>{"Supported formats: JPG, JPEG, PNG"}</p>
                </div>
            };
        };

        let filename = self
            .file
            .as_ref()
            .map(|f| f.name())
            .unwrap_or_else(|| "Selected Image".to_string());
        let link = ctx.link();

        html! {
            <div id="preview-container">
                <img id="image-preview"
                    src={url.to_string()}
                    alt="Fundus Preview"
                    style="max-width:100%; max-height: 400px; object-fit: contain; margin-bottom: 10px;" />
                <div class="button-container">
                    <button
                        class="analyze-btn"
                        onclick={link.callback(|_| Msg::Analyze)}
                        disabled={self.loading}
                    >
                        {
                            if self.loading {
                                html! { <><i class="fa-solid fa-spinner fa-spin"></i>{" Analyzing..."}</> }
                            } else {
                                html! { <><i class="fa-solid fa-magnifying-glass"></i>{ format!(" Analyze \"{}\"", filename) }</> }
                            }
                        }
                    </button>
                </div>
            </div>
        }
    }

    fn render_error_message(&self) -> Html {
        if let Some(error_msg) = &self.error {
            html! {
                <div class="error-message">
                    <i class="fa-solid fa-circle-exclamation"></i>
                    <p>{ error_msg }</p>
                </div>
            }
        } else {
            html! {}
        }
    }

    fn render_results(&self) -> Html {
        let Some(result) = &self.result else {
            return html! {};
        };

        let diagnosis = &result.diagnosis;
        let is_normal = diagnosis.name == "Normal Eye";

        html! {
            <div class={classes!("results-container", if is_normal { "normal-eye" } else { "disease-detected" })}>
                <div class="result-header">
                    <h2>
                        {
                            if is_normal {
                                html! { <><i class="fa-solid fa-circle-check"></i>{" Normal Eye"}</> }
                            } else {
                                html! { <><i class="fa-solid fa-triangle-exclamation"></i>{ format!(" {}", diagnosis.name) }</> }
                            }
                        }
                    </h2>
                    <div class="confidence-meter">
                        <div class="meter-label">{"Confidence:"}</div>
                        <div class="meter">
                            <div class="meter-fill" style={format!("width: {}%", result.confidence)}></div>
                        </div>
                        <div class="meter-value">{format!("{:.1}%", result.confidence)}</div>
                    </div>
                </div>

                <div class="detailed-results">
                    <h3>{"Class Probabilities"}</h3>
                    <div class="result-bars">
                        { for result.class_labels.iter().zip(result.probabilities.iter()).map(|(label, &p)| {
                            let percentage = p * 100.0;
                            html! {
                                <div class="result-item">
                                    <div class="result-label">{ label.clone() }</div>
                                    <div class="result-bar-container">
                                        <div class="result-bar" style={format!("width: {}%", percentage)}></div>
                                    </div>
                                    <div class="result-value">{ format!("{:.1}%", percentage) }</div>
                                </div>
                            }
                        })}
                    </div>

                    <h3>{"About this condition"}</h3>
                    <p class="diagnosis-description">{ diagnosis.description.clone() }</p>

                    { self.render_symptoms() }
                    { self.render_treatment() }
                </div>
            </div>
        }
    }

    fn render_symptoms(&self) -> Html {
        let Some(result) = &self.result else {
            return html! {};
        };
        if result.diagnosis.symptoms.is_empty() {
            return html! {};
        }

        html! {
            <>
                <h3>{"Common Symptoms"}</h3>
                <ul class="symptom-list">
                    { for result.diagnosis.symptoms.iter().map(|s| html! { <li>{ s.clone() }</li> }) }
                </ul>
            </>
        }
    }

    fn render_treatment(&self) -> Html {
        let Some(result) = &self.result else {
            return html! {};
        };
        let treatment = &result.diagnosis.treatment;

        html! {
            <>
                <h3>{"Treatment"}</h3>
                <p class="treatment-description">{ treatment.description.clone() }</p>
                {
                    if treatment.medicines.is_empty() {
                        html! {}
                    } else {
                        html! {
                            <ul class="medicine-list">
                                { for treatment.medicines.iter().map(|m| html! { <li>{ m.clone() }</li> }) }
                            </ul>
                        }
                    }
                }
            </>
        }
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<Model>::new().render();
}

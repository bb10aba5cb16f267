//! Test doubles shared by the unit tests.

use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::agents::{AgentInput, AgentOutput, TextAgent};
use crate::error::{BotError, Result};
use crate::llm::TextModel;
use crate::search::{SearchHit, SearchProvider};
use crate::telegram::ChatTransport;

/// Returns the same hits for every query and records the queries
pub struct StaticSearch {
    hits: Vec<SearchHit>,
    pub queries: Mutex<Vec<String>>,
}

impl StaticSearch {
    pub fn new(hrefs: &[String]) -> Arc<Self> {
        Arc::new(Self {
            hits: hrefs
                .iter()
                .map(|href| SearchHit {
                    title: "result".into(),
                    href: href.clone(),
                })
                .collect(),
            queries: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl SearchProvider for StaticSearch {
    async fn text(&self, query: &str, _max_results: usize) -> Result<Vec<SearchHit>> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok(self.hits.clone())
    }
}

/// Model that answers every prompt with a fixed summary
#[derive(Default)]
pub struct RecordingModel {
    pub prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl TextModel for RecordingModel {
    async fn complete(&self, prompt: &str) -> anyhow::Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok("Five fine paragraphs.".to_string())
    }
}

/// Agent with a canned answer, or a canned failure
pub struct ScriptedAgent {
    answer: std::result::Result<String, String>,
    pub inputs: Mutex<Vec<String>>,
}

impl ScriptedAgent {
    pub fn reply(output: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            answer: Ok(output.into()),
            inputs: Mutex::new(Vec::new()),
        })
    }

    pub fn fail(message: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            answer: Err(message.into()),
            inputs: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl TextAgent for ScriptedAgent {
    async fn invoke(&self, input: AgentInput) -> anyhow::Result<AgentOutput> {
        self.inputs.lock().unwrap().push(input.input);
        match &self.answer {
            Ok(output) => Ok(AgentOutput {
                output: output.clone(),
            }),
            Err(message) => Err(anyhow::anyhow!("{}", message)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Document {
        chat_id: i64,
        path: PathBuf,
        caption: String,
        /// Whether the file was on disk when it was sent
        existed: bool,
    },
    Message {
        chat_id: i64,
        text: String,
    },
}

/// Records everything sent, in order
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<Sent>>,
    fail_documents: bool,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A transport whose document uploads are rejected
    pub fn rejecting_documents() -> Arc<Self> {
        Arc::new(Self {
            fail_documents: true,
            ..Self::default()
        })
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Message { text, .. } => Some(text),
                Sent::Document { .. } => None,
            })
            .collect()
    }

    pub fn documents(&self) -> Vec<PathBuf> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Document { path, .. } => Some(path),
                Sent::Message { .. } => None,
            })
            .collect()
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send_document(&self, chat_id: i64, path: &Path, caption: &str) -> Result<()> {
        if self.fail_documents {
            return Err(BotError::Telegram(
                "sendDocument failed (413): Request Entity Too Large".into(),
            ));
        }
        self.sent.lock().unwrap().push(Sent::Document {
            chat_id,
            path: path.to_path_buf(),
            caption: caption.to_string(),
            existed: path.exists(),
        });
        Ok(())
    }

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        self.sent.lock().unwrap().push(Sent::Message {
            chat_id,
            text: text.to_string(),
        });
        Ok(())
    }
}

/// Writes a one-page PDF showing `text` to `dir/name`
pub fn write_pdf(dir: &Path, name: &str, text: &str) -> PathBuf {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 24.into()]),
            Operation::new("Td", vec![100.into(), 600.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let path = dir.join(name);
    doc.save(&path).unwrap();
    path
}

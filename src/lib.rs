//! Controladores do formulário de geração de DAS.
//!
//! Dois fluxos independentes: o envio individual para `/gerar_das` e o envio
//! de planilha para `/enviar_em_lote`. Cada um guarda a própria view (campos,
//! banners, painel de detalhes) e um [`SubmissionState`] explícito; o que
//! mostrar ao usuário sai das funções puras de [`feedback`].

mod cli;
pub mod client;
pub mod config;
pub mod envio;
pub mod error;
pub mod feedback;
pub mod historico;
pub mod lote;
pub mod parcela;
pub mod senha;
pub mod sistema;

pub use client::DasClient;
pub use config::{Credenciais, DasConfig};
pub use envio::SingleSubmitController;
pub use error::DasClientError;
pub use feedback::SubmissionState;
pub use lote::BatchSubmitController;

use std::process::ExitCode;

// ── App Entry ───────────────────────────────────────────────────
pub fn run() -> ExitCode {
    cli::run()
}

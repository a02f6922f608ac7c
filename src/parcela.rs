// ── Máscara da Parcela (AAAAMM) ─────────────────────────────────

/// Máscara `000000`: apenas dígitos, no máximo seis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParcelaMask;

impl ParcelaMask {
    pub const TAMANHO: usize = 6;

    pub fn aplicar(&self, bruto: &str) -> String {
        bruto
            .chars()
            .filter(|c| c.is_ascii_digit())
            .take(Self::TAMANHO)
            .collect()
    }

    pub fn completa(&self, valor: &str) -> bool {
        valor.len() == Self::TAMANHO && valor.chars().all(|c| c.is_ascii_digit())
    }
}

/// Parcela do mês corrente, no formato aceito pela máscara.
pub fn parcela_atual() -> String {
    chrono::Local::now().format("%Y%m").to_string()
}

// ── Histórico de Requisições e Recibos ──────────────────────────
use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer};

/// Formato de `data_envio` na listagem do backend.
const FORMATO_DATA_ENVIO: &str = "%d/%m/%Y %H:%M:%S";

/// Uma requisição registrada pelo backend em `/consultar_requisicoes`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Requisicao {
    pub id: u64,
    pub contribuinte: String,
    /// Vazio no backend quando a data não foi gravada.
    #[serde(deserialize_with = "data_envio")]
    pub data_envio: Option<NaiveDateTime>,
    pub status: String,
    /// Se a guia em PDF está disponível para download.
    #[serde(rename = "resposta_base64")]
    pub tem_recibo: bool,
}

impl std::fmt::Display for Requisicao {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let data = self
            .data_envio
            .map(|d| d.format(FORMATO_DATA_ENVIO).to_string())
            .unwrap_or_default();
        let recibo = if self.tem_recibo { "sim" } else { "não" };
        write!(
            f,
            "{} - {} - {} - {} - recibo: {}",
            self.id, self.contribuinte, data, self.status, recibo
        )
    }
}

fn data_envio<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDateTime::parse_from_str(&raw, FORMATO_DATA_ENVIO)
        .map(Some)
        .map_err(serde::de::Error::custom)
}

/// Arquivo baixado: a guia em PDF ou o ZIP com todas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recibo {
    pub nome: String,
    pub conteudo: Vec<u8>,
}

/// Nome sugerido no `Content-Disposition` de um anexo.
pub fn nome_do_anexo(header: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|parte| parte.strip_prefix("filename="))
        .map(|nome| nome.trim_matches('"').to_string())
        .filter(|nome| !nome.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn le_a_listagem_do_backend() {
        let lista: Vec<Requisicao> = serde_json::from_str(
            r#"[
                {"id": 1, "contribuinte": "12345678000190", "data_envio": "05/06/2024 14:30:00",
                 "status": "Concluído", "resposta_base64": true},
                {"id": 2, "contribuinte": "98765432000110", "data_envio": "",
                 "status": "Concluído", "resposta_base64": false}
            ]"#,
        )
        .unwrap();

        let data = lista[0].data_envio.unwrap();
        assert_eq!((data.day(), data.month(), data.year()), (5, 6, 2024));
        assert_eq!(data.hour(), 14);
        assert!(lista[0].tem_recibo);
        assert_eq!(lista[1].data_envio, None);
        assert!(!lista[1].tem_recibo);
    }

    #[test]
    fn rejeita_data_fora_do_formato() {
        let r = serde_json::from_str::<Requisicao>(
            r#"{"id": 1, "contribuinte": "1", "data_envio": "2024-06-05",
                "status": "x", "resposta_base64": false}"#,
        );
        assert!(r.is_err());
    }

    #[test]
    fn nome_do_anexo_com_e_sem_aspas() {
        assert_eq!(
            nome_do_anexo(r#"attachment; filename="0000-PARC SN-052024.pdf""#).as_deref(),
            Some("0000-PARC SN-052024.pdf")
        );
        assert_eq!(
            nome_do_anexo("attachment; filename=recibos_em_lote.zip").as_deref(),
            Some("recibos_em_lote.zip")
        );
        assert_eq!(nome_do_anexo("attachment"), None);
    }

    #[test]
    fn requisicao_exibe_uma_linha() {
        let r = Requisicao {
            id: 3,
            contribuinte: "123".into(),
            data_envio: None,
            status: "Concluído".into(),
            tem_recibo: true,
        };
        assert_eq!(r.to_string(), "3 - 123 -  - Concluído - recibo: sim");
    }
}

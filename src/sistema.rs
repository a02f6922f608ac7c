// ── Sistema → Serviço ───────────────────────────────────────────
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Código de serviço de emissão para cada `id_sistema` de parcelamento.
static SISTEMA_SERVICO: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    BTreeMap::from([
        ("PARCSN", "GERARDAS161"),
        ("PARCSN-ESP", "GERARDAS171"),
        ("PERTSN", "GERARDAS181"),
        ("RELPSN", "GERARDAS191"),
        ("PARCMEI", "GERARDAS201"),
        ("PARCMEI-ESP", "GERARDAS211"),
        ("PERTMEI", "GERARDAS221"),
        ("RELPMEI", "GERARDAS231"),
    ])
});

/// Serviço mapeado para o sistema, se houver.
pub fn servico_para(id_sistema: &str) -> Option<&'static str> {
    SISTEMA_SERVICO.get(id_sistema).copied()
}

/// Todos os sistemas conhecidos, em ordem alfabética.
pub fn sistemas() -> impl Iterator<Item = &'static str> {
    SISTEMA_SERVICO.keys().copied()
}

/// Reação ao evento de mudança do seletor de sistema.
///
/// Devolve o novo valor do campo `id_servico`: o código mapeado, ou vazio
/// quando o sistema ainda não foi resolvido.
pub fn ao_mudar_sistema(id_sistema: &str) -> String {
    servico_para(id_sistema).map(str::to_string).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todos_os_sistemas_preenchem_o_servico() {
        let esperados = [
            ("PARCSN", "GERARDAS161"),
            ("PARCSN-ESP", "GERARDAS171"),
            ("PERTSN", "GERARDAS181"),
            ("RELPSN", "GERARDAS191"),
            ("PARCMEI", "GERARDAS201"),
            ("PARCMEI-ESP", "GERARDAS211"),
            ("PERTMEI", "GERARDAS221"),
            ("RELPMEI", "GERARDAS231"),
        ];
        for (sistema, servico) in esperados {
            assert_eq!(ao_mudar_sistema(sistema), servico);
        }
        assert_eq!(sistemas().count(), 8);
    }

    #[test]
    fn sistema_desconhecido_limpa_o_servico() {
        assert_eq!(ao_mudar_sistema(""), "");
        assert_eq!(ao_mudar_sistema("parcsn"), "");
        assert_eq!(ao_mudar_sistema("OUTRO"), "");
        assert!(servico_para("RELP").is_none());
    }
}

// ── Visibilidade da Senha ───────────────────────────────────────

/// Alterna o campo de senha entre oculto e visível.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PasswordToggle {
    visivel: bool,
}

impl PasswordToggle {
    pub fn alternar(&mut self) {
        self.visivel = !self.visivel;
    }

    pub fn tipo_input(&self) -> &'static str {
        if self.visivel { "text" } else { "password" }
    }

    pub fn icone(&self) -> &'static str {
        if self.visivel { "fa-eye-slash" } else { "fa-eye" }
    }
}

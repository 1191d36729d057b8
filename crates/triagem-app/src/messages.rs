//! User-facing text. The app's users read Portuguese.

pub const MISSING_FIELDS: &str = "Preencha todos os campos.";
pub const INVALID_AGE: &str = "Informe uma idade válida.";
pub const INVALID_SEVERITY: &str = "Insira uma gravidade válida (1 a 5).";
pub const PATIENT_ADDED: &str = "Paciente adicionado com sucesso.";
pub const PERSISTENCE_FAILED: &str = "Erro ao salvar no banco.";

pub const NO_SELECTION_TITLE: &str = "Nenhum paciente selecionado";
pub const NO_SELECTION: &str = "Por favor, selecione um paciente para excluir.";
pub const MISSING_IDENTIFIER: &str = "Paciente sem ID válido.";
pub const UNKNOWN_POSITION: &str = "Paciente não encontrado na fila.";
pub const SNAPSHOT_UNAVAILABLE: &str = "Não foi possível carregar a fila.";

pub const CONFIRM_TITLE: &str = "Confirmação";
pub const CONFIRM_DELETE: &str = "Deseja realmente excluir o paciente selecionado?";
pub const CONFIRM_CLEAR_ALL: &str = "Deseja realmente limpar todos os pacientes da fila?";
pub const DELETE_LABEL: &str = "Excluir";
pub const CLEAR_ALL_LABEL: &str = "Limpar Todos";
pub const CANCEL_LABEL: &str = "Cancelar";

pub const EMPTY_QUEUE: &str = "Nenhum paciente na fila.";

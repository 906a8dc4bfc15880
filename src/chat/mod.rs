// ============================================================
// Layer 5 — Chat Prompt
// ============================================================
// The bot talks to the fine-tuned model with the same markers
// the training data uses:
//
//   <SC6>{persona}Собеседник: {message}\nТы: <extra_id_0>
//
// and cleans the decoded generation before replying. Both are
// pure string routines; running the model and talking to the
// chat service live elsewhere.

pub mod prompt;

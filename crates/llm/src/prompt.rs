/// Build the instruction sent to the text-understanding service.
///
/// The template names the five identity fields in a fixed `Field: value`
/// layout and tells the model to drop any field it cannot find, so the
/// returned answer needs no schema validation downstream.
pub fn build_instruction(context: &str) -> String {
    format!(
        "Context: {context}\n\n\
         Extract the following information from the context and format it as:\n\
         Name: <name>\n\
         Father's Name: <father's name>\n\
         Date of Birth: <date of birth>\n\
         ID Number: <ID number>\n\
         Gender: <gender>\n\
         Answer concisely in this format (Do not show the field if info is missing):"
    )
}

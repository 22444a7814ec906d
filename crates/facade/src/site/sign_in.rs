//! Login form.

use facade_compose::{
    block, button, container, heading, password_input, text_input, Border, NodeResult, Radius,
};

/// Static login form. Nothing is submitted anywhere.
pub fn layout() -> NodeResult {
    container()
        .padding(3)
        .border(Border::Standard)
        .radius(Radius::Standard)
        .max_width("300px")
        .child(heading(2, "Login"))
        .child(text_input("email", "Email"))
        .child(password_input("password", "Password"))
        .child(block(button("login", "Login")))
        .build()
}

/// A person's name and how to reach them
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Contact {
    pub name: String,
    pub mail_to: String,
    pub phone: Option<String>,
}

crate::properties!(Contact {
    "Name" => name: String,
    "MailTo" => mail_to: String,
    "Phone" => phone: Option<String>,
});

crate::register_backing!(Contact, "Person name, mailbox and optional phone");

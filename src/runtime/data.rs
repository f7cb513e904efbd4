/// Value produced by a match
///
/// Values not built by host code have a fixed shape:
///
/// * literals, classes, `.` and `$` produce [`Value::Str`]
/// * sequences and repetitions produce [`Value::List`]
/// * predicates, lookaheads and missed optionals produce [`Value::Null`]
///
/// Rule invocations are transparent: they produce the value of the rule's expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<T> {
    Null,
    Str(String),
    List(Vec<Value<T>>),

    /// Produced by an action
    Host(T),
}

impl<T> Value<T> {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(string) => Some(string),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value<T>]> {
        match self {
            Self::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_host(&self) -> Option<&T> {
        match self {
            Self::Host(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_host(self) -> Option<T> {
        match self {
            Self::Host(value) => Some(value),
            _ => None,
        }
    }

    /// Concatenate every string found in this value, depth-first
    ///
    /// Host values are skipped.
    pub fn concat(&self) -> String {
        let mut out = String::new();
        self.concat_into(&mut out);
        out
    }

    fn concat_into(&self, out: &mut String) {
        match self {
            Self::Null | Self::Host(_) => {}
            Self::Str(string) => out.push_str(string),
            Self::List(list) => list.iter().for_each(|value| value.concat_into(out)),
        }
    }
}

impl<T> From<&str> for Value<T> {
    fn from(string: &str) -> Self {
        Self::Str(string.to_string())
    }
}

impl<T> From<String> for Value<T> {
    fn from(string: String) -> Self {
        Self::Str(string)
    }
}

impl<T> From<Vec<Value<T>>> for Value<T> {
    fn from(list: Vec<Value<T>>) -> Self {
        Self::List(list)
    }
}

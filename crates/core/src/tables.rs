//! Static reference data: keyword and intrinsic-function descriptions,
//! the completion keyword list and the highlighting word sets.

/// Markdown descriptions of statement keywords, keyed by upper-case name.
pub const KEYWORD_INFO: &[(&str, &str)] = &[
    ("IF", "**IF** *expression* **THEN** *statements* [**ELSE** *statements*]\n\nConditional execution."),
    ("FOR", "**FOR** *var* **=** *start* **TO** *end* [**STEP** *inc*] ... **NEXT** *var*\n\nCounted loop."),
    ("LOOP", "**LOOP** ... **WHILE**/**UNTIL** *condition* **DO** ... **REPEAT**\n\nConditional loop."),
    ("GOTO", "**GOTO** *label*\n\nUnconditional branch to a label."),
    ("GOSUB", "**GOSUB** *label*\n\nBranch to a subroutine at *label*, returning with **RETURN**."),
    ("RETURN", "**RETURN** [**TO** *label*]\n\nReturn from a **GOSUB** subroutine."),
    ("CALL", "**CALL** *name* [**(** *args* **)**]\n\nCall an external cataloged subroutine."),
    ("SUBROUTINE", "**SUBROUTINE** [*name*] [**(** *args* **)**]\n\nDeclare an external subroutine entry point."),
    ("DIM", "**DIM** *array* **(** *rows* [**,** *cols*] **)**\n\nDimension a static array."),
    ("EQUATE", "**EQUATE** *name* **TO** *value*\n\nDefine a compile-time constant."),
    ("EQU", "**EQU** *name* **TO** *value*\n\nDefine a compile-time constant (alias for EQUATE)."),
    ("COMMON", "**COMMON** [**/** *block* **/**] *var1*, *var2*, ...\n\nDeclare variables shared between chained programs."),
    ("PRINT", "**PRINT** [*expression*] [**:** | **,** | **;**]\n\nOutput to the terminal."),
    ("CRT", "**CRT** *expression*\n\nOutput to the CRT (screen)."),
    ("INPUT", "**INPUT** *var* [**,** *length*] [**:**]\n\nRead keyboard input into a variable."),
    ("OPEN", "**OPEN** *dict*, *filename* **TO** *filevar* [**ELSE** *statements*]\n\nOpen a file for I/O."),
    ("READ", "**READ** *var* **FROM** *filevar*, *id* [**THEN** ...] [**ELSE** ...]\n\nRead a record from an open file."),
    ("WRITE", "**WRITE** *var* **ON** *filevar*, *id* [**THEN** ...] [**ELSE** ...]\n\nWrite a record to an open file."),
    ("DELETE", "**DELETE** *filevar*, *id*\n\nDelete a record from a file."),
    ("SELECT", "**SELECT** *filevar* [**TO** *list*]\n\nCreate a select list of record IDs."),
    ("READNEXT", "**READNEXT** *id* [**FROM** *list*] [**THEN** ...] [**ELSE** ...]\n\nRead next ID from a select list."),
    ("LOCATE", "**LOCATE** *expr* **IN** *dynarray* [**,** *pos*] **SETTING** *var* [**THEN** ...] [**ELSE** ...]\n\nSearch a dynamic array."),
    ("EXECUTE", "**EXECUTE** *command* [**CAPTURING** *var*] [**RETURNING** *var*]\n\nExecute a TCL command."),
    ("STOP", "**STOP** [*message*]\n\nTerminate program execution."),
    ("ABORT", "**ABORT** [*message*]\n\nAbort program execution (no RETURN)."),
    ("PRECISION", "**PRECISION** *n*\n\nSet decimal precision for arithmetic."),
    ("SLEEP", "**SLEEP** *seconds*\n\nPause execution for a number of seconds."),
    ("LOCK", "**LOCK** *filevar*, *id* [**THEN** ...] [**ELSE** ...]\n\nLock a record for exclusive access."),
    ("UNLOCK", "**UNLOCK** *filevar*, *id*\n\nRelease a record lock."),
    ("RELEASE", "**RELEASE** [*filevar* [**,** *id*]]\n\nRelease record locks."),
    ("BEGIN", "**BEGIN CASE** ... **CASE** *expr* ... **END CASE**\n\nMulti-way conditional."),
    ("MAT", "**MAT** *array* **=** *value*\n\nAssign a value to all elements of a dimensioned array."),
    ("MATREAD", "**MATREAD** *array* **FROM** *filevar*, *id* [**THEN** ...] [**ELSE** ...]\n\nRead a record into a dimensioned array."),
    ("MATWRITE", "**MATWRITE** *array* **ON** *filevar*, *id*\n\nWrite a dimensioned array as a record."),
    ("CHAIN", "**CHAIN** *program*\n\nTransfer control to another program."),
    ("ENTER", "**ENTER** *program*\n\nTransfer control (no RETURN possible)."),
    ("DATA", "**DATA** *expression* [**,** *expression* ...]\n\nStack data for subsequent INPUT."),
    ("PROMPT", "**PROMPT** *char*\n\nSet the INPUT prompt character."),
    ("ON", "**ON** *expression* **GOTO**/**GOSUB** *label1*, *label2*, ...\n\nComputed branch."),
    ("NULL", "**NULL**\n\nNo operation (placeholder statement)."),
    ("CLEAR", "**CLEAR**\n\nClear all variables to zero/empty."),
    ("CLEARFILE", "**CLEARFILE** *filevar*\n\nDelete all records from a file."),
    ("PAGE", "**PAGE** [*printer*]\n\nAdvance to next page on printer."),
    ("HEADING", "**HEADING** *string*\n\nSet page heading for printer output."),
    ("FOOTING", "**FOOTING** *string*\n\nSet page footing for printer output."),
    ("PRINTER", "**PRINTER ON** | **OFF** | **CLOSE**\n\nControl printer output routing."),
    ("BREAK", "**BREAK ON** | **OFF**\n\nEnable or disable the break key."),
    ("ECHO", "**ECHO ON** | **OFF**\n\nEnable or disable terminal echo."),
];

/// Markdown signatures of intrinsic functions, keyed by upper-case name.
pub const FUNCTION_INFO: &[(&str, &str)] = &[
    ("ABS", "**ABS(** *expr* **)** → Absolute value"),
    ("ALPHA", "**ALPHA(** *expr* **)** → Returns 1 if string is all alphabetic"),
    ("ASCII", "**ASCII(** *expr* **)** → Convert EBCDIC to ASCII"),
    ("CHAR", "**CHAR(** *n* **)** → Character from numeric code"),
    ("COL1", "**COL1()** → Column position before last FIELD extraction"),
    ("COL2", "**COL2()** → Column position after last FIELD extraction"),
    ("CONVERT", "**CONVERT(** *from*, *to*, *string* **)** → Replace characters"),
    ("COS", "**COS(** *expr* **)** → Cosine"),
    ("COUNT", "**COUNT(** *string*, *substring* **)** → Count occurrences"),
    ("DATE", "**DATE()** → Internal date (days since Dec 31, 1967)"),
    ("DCOUNT", "**DCOUNT(** *string*, *delimiter* **)** → Count delimited fields"),
    ("DELETE", "**DELETE(** *dynarray*, *amc* [**,** *vmc* [**,** *svmc*]] **)** → Delete from dynamic array"),
    ("DOWNCASE", "**DOWNCASE(** *string* **)** → Convert to lowercase"),
    ("DQUOTE", "**DQUOTE(** *string* **)** → Wrap in double quotes"),
    ("DTX", "**DTX(** *decimal* **)** → Decimal to hexadecimal"),
    ("EBCDIC", "**EBCDIC(** *string* **)** → Convert ASCII to EBCDIC"),
    ("EXCHANGE", "**EXCHANGE(** *string*, *from*, *to* **)** → Character exchange"),
    ("EXP", "**EXP(** *expr* **)** → Natural exponential (e^x)"),
    ("EXTRACT", "**EXTRACT(** *dynarray*, *amc* [**,** *vmc* [**,** *svmc*]] **)** → Extract from dynamic array"),
    ("FIELD", "**FIELD(** *string*, *delim*, *occurrence* [**,** *count*] **)** → Extract delimited field"),
    ("FIELDSTORE", "**FIELDSTORE(** *string*, *delim*, *start*, *count*, *new* **)** → Replace delimited fields"),
    ("FMT", "**FMT(** *expr*, *format* **)** → Format expression for output"),
    ("FOLD", "**FOLD(** *string*, *length* **)** → Word-wrap string"),
    ("ICONV", "**ICONV(** *string*, *code* **)** → Input conversion"),
    ("INDEX", "**INDEX(** *string*, *substring*, *occurrence* **)** → Find position of substring"),
    ("INMAT", "**INMAT()** → Number of elements from last MATREAD"),
    ("INSERT", "**INSERT(** *dynarray*, *amc* [**,** *vmc* [**,** *svmc*]]**;** *value* **)** → Insert into dynamic array"),
    ("INT", "**INT(** *expr* **)** → Integer portion"),
    ("LEN", "**LEN(** *string* **)** → String length"),
    ("LN", "**LN(** *expr* **)** → Natural logarithm"),
    ("MOD", "**MOD(** *dividend*, *divisor* **)** → Modulo (remainder)"),
    ("NOT", "**NOT(** *expr* **)** → Logical negation"),
    ("NUM", "**NUM(** *string* **)** → Returns 1 if string is numeric"),
    ("OCONV", "**OCONV(** *expr*, *code* **)** → Output conversion"),
    ("PWR", "**PWR(** *base*, *exponent* **)** → Power"),
    ("REPLACE", "**REPLACE(** *dynarray*, *amc* [**,** *vmc* [**,** *svmc*]]**;** *value* **)** → Replace in dynamic array"),
    ("RND", "**RND(** *range* **)** → Random number 0 to range-1"),
    ("SEQ", "**SEQ(** *char* **)** → Numeric code of character"),
    ("SIN", "**SIN(** *expr* **)** → Sine"),
    ("SOUNDEX", "**SOUNDEX(** *string* **)** → Soundex code"),
    ("SPACE", "**SPACE(** *n* **)** → String of n spaces"),
    ("SQRT", "**SQRT(** *expr* **)** → Square root"),
    ("STATUS", "**STATUS()** → Status of last file operation"),
    ("STR", "**STR(** *string*, *count* **)** → Repeat string"),
    ("SYSTEM", "**SYSTEM(** *n* **)** → System information by code number"),
    ("TAN", "**TAN(** *expr* **)** → Tangent"),
    ("TIME", "**TIME()** → Internal time (seconds since midnight)"),
    ("TIMEDATE", "**TIMEDATE()** → Current time and date string"),
    ("TRIM", "**TRIM(** *string* **)** → Remove leading/trailing spaces"),
    ("TRIMB", "**TRIMB(** *string* **)** → Trim trailing spaces"),
    ("TRIMF", "**TRIMF(** *string* **)** → Trim leading spaces"),
    ("UPCASE", "**UPCASE(** *string* **)** → Convert to uppercase"),
    ("XTD", "**XTD(** *hex* **)** → Hexadecimal to decimal"),
];

/// Keywords offered by completion.
pub const COMPLETION_KEYWORDS: &[&str] = &[
    "ABORT", "AND", "BEGIN", "BREAK", "BY", "CALL", "CASE", "CHAIN", "CLEAR", "CLEARFILE",
    "CLOSE", "COM", "COMMON", "CONVERT", "CRT", "DATA", "DELETE", "DIM", "DIMENSION", "DO",
    "ECHO", "ELSE", "END", "ENTER", "EQU", "EQUATE", "ERROR", "EXECUTE", "EXIT", "FOR",
    "FOOTING", "FROM", "GO", "GOSUB", "GOTO", "HEADING", "IF", "IN", "INPUT", "INPUTERR",
    "INPUTNULL", "INPUTTRAP", "LOCKED", "LITERALLY", "LOCATE", "LOCK", "LOOP", "MAT", "MATREAD",
    "MATREADU", "MATWRITE", "MATWRITEU", "NEXT", "NOT", "NULL", "ON", "OPEN", "OR", "PAGE",
    "PRECISION", "PRINT", "PRINTER", "PROCREAD", "PROCWRITE", "PROMPT", "READ", "READNEXT",
    "READT", "READU", "READV", "READVU", "RELEASE", "REPEAT", "RETURN", "RETURNING", "REWIND",
    "RQM", "SELECT", "SETTING", "SLEEP", "STEP", "STOP", "SUB", "SUBROUTINE", "THEN", "TO",
    "UNLOCK", "UNTIL", "WEOF", "WHILE", "WRITE", "WRITEU", "WRITET", "WRITEV", "WRITEVU",
    "CAPTURING",
];

/// Functions offered by completion, inserted with an opening parenthesis.
pub const COMPLETION_FUNCTIONS: &[&str] = &[
    "ABS", "ALPHA", "ASCII", "CHAR", "COL1", "COL2", "CONVERT", "COS", "COUNT", "DATE", "DCOUNT",
    "DELETE", "DOWNCASE", "DQUOTE", "DTX", "EBCDIC", "EXCHANGE", "EXP", "EXTRACT", "FIELD",
    "FIELDSTORE", "FMT", "FOLD", "ICONV", "INDEX", "INMAT", "INSERT", "INT", "LEN", "LN", "MOD",
    "NOT", "NUM", "OCONV", "PWR", "REPLACE", "RND", "SEQ", "SIN", "SOUNDEX", "SPACE", "SQRT",
    "STATUS", "STR", "SYSTEM", "TAN", "TIME", "TIMEDATE", "TRIM", "TRIMB", "TRIMF", "UPCASE",
    "XTD",
];

/// Anonymous tokens highlighted as keywords.
pub const HIGHLIGHT_KEYWORDS: &[&str] = &[
    "IF", "THEN", "ELSE", "END", "FOR", "TO", "STEP", "NEXT", "WHILE", "UNTIL", "DO", "LOOP",
    "REPEAT", "BEGIN", "CASE", "GOTO", "GO", "GOSUB", "SUB", "ON", "RETURN", "STOP", "ABORT",
    "DIM", "DIMENSION", "COMMON", "COM", "EQUATE", "EQU", "SUBROUTINE", "CALL", "NULL", "CLEAR",
    "PRECISION", "PRINT", "CRT", "INPUT", "INPUT@", "INPUTERR", "INPUTNULL", "INPUTTRAP",
    "DATA", "PROMPT", "PAGE", "HEADING", "FOOTING", "PRINTER", "BREAK", "ECHO", "OPEN", "READ",
    "READU", "READV", "READVU", "WRITE", "WRITEU", "WRITEV", "WRITEVU", "DELETE", "READNEXT",
    "READT", "WRITET", "SELECT", "LOCK", "UNLOCK", "RELEASE", "CLEARFILE", "MATREAD",
    "MATREADU", "MATWRITE", "MATWRITEU", "LOCATE", "FROM", "SETTING", "IN", "LOCKED",
    "LITERALLY", "ERROR", "EXECUTE", "CAPTURING", "RETURNING", "CHAIN", "ENTER", "SLEEP", "RQM",
    "MAT", "PROCREAD", "PROCWRITE", "REWIND", "WEOF",
];

/// Anonymous tokens highlighted as operators; word forms match case-insensitively.
pub const HIGHLIGHT_OPERATORS: &[&str] = &[
    "AND", "OR", "NOT", "CAT", "MATCH", "MATCHES", "EQ", "NE", "LT", "GT", "LE", "GE", "+", "-",
    "*", "/", "^", "**", ":", "=", "<", ">", "<>", "#", "<=", ">=", "=<", "=>",
];

fn lookup(table: &'static [(&'static str, &'static str)], name: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, info)| *info)
}

pub fn keyword_info(name: &str) -> Option<&'static str> {
    lookup(KEYWORD_INFO, name)
}

pub fn function_info(name: &str) -> Option<&'static str> {
    lookup(FUNCTION_INFO, name)
}

pub fn is_completion_keyword(name: &str) -> bool {
    COMPLETION_KEYWORDS
        .iter()
        .any(|keyword| keyword.eq_ignore_ascii_case(name))
}

pub fn is_completion_function(name: &str) -> bool {
    COMPLETION_FUNCTIONS
        .iter()
        .any(|function| function.eq_ignore_ascii_case(name))
}

pub fn is_highlight_keyword(text: &str) -> bool {
    HIGHLIGHT_KEYWORDS
        .iter()
        .any(|keyword| keyword.eq_ignore_ascii_case(text))
}

pub fn is_highlight_operator(text: &str) -> bool {
    HIGHLIGHT_OPERATORS
        .iter()
        .any(|operator| operator.eq_ignore_ascii_case(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_ignore_case() {
        assert!(keyword_info("print").unwrap().contains("PRINT"));
        assert!(function_info("Char").unwrap().starts_with("**CHAR("));
        assert!(keyword_info("CHAR").is_none());
    }

    #[test]
    fn tables_are_keyed_in_upper_case() {
        for (key, _) in KEYWORD_INFO.iter().chain(FUNCTION_INFO) {
            assert_eq!(*key, key.to_ascii_uppercase());
        }
    }

    #[test]
    fn word_operators_are_not_keywords() {
        assert!(is_highlight_operator("and"));
        assert!(is_highlight_operator("<>"));
        assert!(!is_highlight_keyword("AND"));
    }
}

/// Counters collected while correcting one source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorrectionReport {
    /// Data lines read, header excluded.
    pub lines_read: usize,
    /// Lines whose field count differed from the file header after realignment.
    pub realignment_errors: usize,
    /// Misplaced phone numbers moved out of the email field.
    pub phones_recovered: usize,
    /// Rows added for numbers recovered from the email field.
    pub reconciled_rows: usize,
    /// Rows still wider or narrower than the header after reconciliation.
    pub unreconciled_rows: usize,
    /// Rows added for additional phone numbers.
    pub phone_rows: usize,
    /// Rows added for additional email addresses.
    pub email_rows: usize,
    /// Email fields cleared because no address was found.
    pub emails_cleared: usize,
    /// Rows whose name field absorbed the following field.
    pub name_merges: usize,
    /// Rows padded or truncated to the header width.
    pub width_adjusted: usize,
    /// Rows in the corrected dataset.
    pub rows_out: usize,
}

impl CorrectionReport {
    /// Number of correction errors: malformed lines that could not be repaired.
    pub fn error_count(&self) -> usize {
        self.realignment_errors + self.unreconciled_rows + self.width_adjusted
    }

    /// Rows added by splitting multi-valued contact fields.
    pub fn rows_added(&self) -> usize {
        self.reconciled_rows + self.phone_rows + self.email_rows
    }
}

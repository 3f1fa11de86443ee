//! Shared fixtures for the siu integration tests

/// A complete, realistic SIU^S12 message exercising every mapped segment
/// plus one unmapped type (RGS).
pub const FULL_MESSAGE: &str = "\
MSH|^~\\&|SCHED_SYS|CLINIC_A|EHR_SYS|HOSPITAL|20250502090000||SIU^S12|MSG001|P|2.5\r\
SCH|123456^^PLACER|778899^^FILLER||||ROUTINE^Routine checkup||CHECKUP^Checkup|30|m|^^^20250502130000^20250502133000\r\
PID|1||P12345^^^HOSP||Doe^John^^^Mr.||19850210|M\r\
PV1|1|O|OPD^203^^CLINIC_A||||D67890^Smith^Jane^^^Dr.\r\
RGS|1|A\r\
AIP|1||D67890^Smith^Jane|ATND^Attending Physician\r\
AIP|2||N00112^Rivera^Sam|NURSE^Nurse\r\
AIL|1||ENDO^1^^MAIN|CLINIC^Clinic Room\r\
NTE|1||Patient prefers morning slots\r\
NTE|2||Bring referral letter";

/// Smallest message that parses without warnings
pub fn minimal_message(control_id: &str, appointment_id: &str) -> String {
    format!(
        "MSH|^~\\&|SCHED|CLINIC|EHR|HOSP|20250502090000||SIU^S12|{control_id}|P|2.5\r\
         SCH|{appointment_id}||||||||||^^^20250502130000"
    )
}

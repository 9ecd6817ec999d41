//! Built-in demonstration dataset
//!
//! Ten companies used when running offline (`--sample`) or when the API
//! cannot be reached and the fallback is enabled.

use crate::record::Record;
use crate::types::Porte;

/// The sample companies, ordered by B/C ratio descending
pub fn sample_records() -> Vec<Record> {
    [
        (1, "12345678000123", "Empresa Alpha Ltda", "Tecnologia", "Centro", Porte::Me, 2.5, 450000.0),
        (2, "98765432000156", "Beta Comércio SA", "Comércio", "Jardim Universitário", Porte::Grande, 2.1, 320000.0),
        (3, "11122233000144", "Gamma Indústria ME", "Indústria", "Distrito Industrial", Porte::Epp, 1.9, 280000.0),
        (4, "44455566000177", "Delta Serviços Ltda", "Serviços", "Centro", Porte::Me, 1.8, 250000.0),
        (5, "77788899000166", "Epsilon Tech SA", "Tecnologia", "Jardim Universitário", Porte::Grande, 1.7, 220000.0),
        (6, "33344455000188", "Zeta Construção ME", "Construção", "Centro", Porte::Me, 1.6, 200000.0),
        (7, "66677788000155", "Eta Alimentação Ltda", "Alimentação", "Cascavel Velho", Porte::Epp, 1.5, 180000.0),
        (8, "99988877000144", "Theta Logística SA", "Logística", "Distrito Industrial", Porte::Grande, 1.4, 160000.0),
        (9, "55566677000133", "Iota Consultoria ME", "Consultoria", "Centro", Porte::Me, 1.3, 140000.0),
        (10, "22233344000122", "Kappa Varejo Ltda", "Varejo", "Jardim Universitário", Porte::Epp, 1.2, 120000.0),
    ]
    .into_iter()
    .map(|(id, cnpj, name, setor, bairro, porte, bc, impacto)| {
        Record::new(id, cnpj)
            .with_razao_social(name)
            .with_setor(setor)
            .with_bairro(bairro)
            .with_porte(porte)
            .with_metrics(bc, impacto)
    })
    .collect()
}

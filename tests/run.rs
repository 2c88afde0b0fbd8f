use std::fs;

use assert_matches::assert_matches;

use ena_metadata_xml::app::{RunJob, convert_runs};
use ena_metadata_xml::error::MetadataError;

#[test]
fn mapping_to_run_xml() {
    let temp = tempfile::tempdir().unwrap();
    let mapping = temp.path().join("run_mapping.csv");
    let output = temp.path().join("run.xml");
    fs::write(
        &mapping,
        "experiment_alias,fastq_1,fastq_2,md5_1,md5_2\n\
         S1__RNAseq_PE , a_1.fastq.gz,a_2.fastq.gz,ABCDEF,123456\n",
    )
    .unwrap();

    let result = convert_runs(&RunJob {
        mapping,
        output: output.clone(),
    })
    .unwrap();
    assert_eq!(result.document, "RUN_SET");
    assert_eq!(result.records, 1);

    let xml = fs::read_to_string(&output).unwrap();
    assert!(xml.contains("<RUN alias=\"S1__RNAseq_PE__run\">"));
    assert!(xml.contains("<EXPERIMENT_REF refname=\"S1__RNAseq_PE\"/>"));
    assert!(xml.contains(
        "<FILE filename=\"a_1.fastq.gz\" filetype=\"fastq\" checksum_method=\"MD5\" checksum=\"abcdef\"/>"
    ));
    assert!(xml.contains(
        "<FILE filename=\"a_2.fastq.gz\" filetype=\"fastq\" checksum_method=\"MD5\" checksum=\"123456\"/>"
    ));
}

#[test]
fn missing_column_is_fatal() {
    let temp = tempfile::tempdir().unwrap();
    let mapping = temp.path().join("run_mapping.csv");
    fs::write(&mapping, "experiment_alias,fastq_1,fastq_2,md5_1\nS1,a,b,c\n").unwrap();

    let err = convert_runs(&RunJob {
        mapping,
        output: temp.path().join("run.xml"),
    })
    .unwrap_err();
    assert_matches!(err, MetadataError::MissingColumn { column, .. } if column == "md5_2");
}

#[test]
fn blank_field_aborts_without_output() {
    let temp = tempfile::tempdir().unwrap();
    let mapping = temp.path().join("run_mapping.csv");
    let output = temp.path().join("run.xml");
    fs::write(
        &mapping,
        "experiment_alias,fastq_1,fastq_2,md5_1,md5_2\nS1__RNAseq_PE,a_1.fq,a_2.fq,  ,ff\n",
    )
    .unwrap();

    let err = convert_runs(&RunJob {
        mapping,
        output: output.clone(),
    })
    .unwrap_err();
    assert_matches!(err, MetadataError::IncompleteRunRow { experiment_alias } if experiment_alias == "S1__RNAseq_PE");
    assert!(!output.exists());
}

#[test]
fn unknown_experiment_alias_is_not_checked() {
    let temp = tempfile::tempdir().unwrap();
    let mapping = temp.path().join("run_mapping.csv");
    fs::write(
        &mapping,
        "experiment_alias,fastq_1,fastq_2,md5_1,md5_2\nnowhere,x_1.fq,x_2.fq,aa,bb\n",
    )
    .unwrap();

    let result = convert_runs(&RunJob {
        mapping,
        output: temp.path().join("run.xml"),
    })
    .unwrap();
    assert_eq!(result.records, 1);
}
